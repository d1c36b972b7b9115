//! xsmall: smallest runnable colony.
//!
//! One home region and an outpost, quotas for most roles, and a few hundred
//! ticks of the full controller against the in-memory world.  Set `RUST_LOG=debug`
//! (or `hive_behavior=debug`) to watch status changes as they happen.

mod map;

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hive_agent::{RegionReport, Role, Status};
use hive_core::{AgentId, EntityKind, RegionId, Tick};
use hive_sim::{ColonyBuilder, ColonyConfig, ColonyObserver, TickReport};
use hive_spawn::load_quotas_reader;
use hive_world::World;

use map::{HOME, build_world};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:  u64 = 42;
const TICKS: u64 = 400;

// ── Quota CSV ─────────────────────────────────────────────────────────────────

// role,home,minimum,per_source,remote
const QUOTAS_CSV: &str = "\
role,home,minimum,per_source,remote\n\
harvester,E0S0,1,true,\n\
hauler,E0S0,1,true,\n\
nurse,E0S0,1,,\n\
upgrader,E0S0,2,,\n\
worker,E0S0,1,,\n\
repairer,E0S0,1,,\n\
remoteharvester,E0S0,1,,E1S0\n\
scout,E0S0,1,,\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tally {
    spawned:     usize,
    transitions: usize,
    surveys:     usize,
    last:        Option<TickReport>,
}

impl ColonyObserver for Tally {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.last = Some(*report);
    }

    fn on_transition(&mut self, _agent: AgentId, _role: Role, _from: Option<Status>, _to: Status) {
        self.transitions += 1;
    }

    fn on_spawn(&mut self, agent: AgentId, role: Role, home: RegionId) {
        self.spawned += 1;
        info!(%agent, %role, %home, "new agent");
    }

    fn on_budget_exhausted(&mut self, tick: Tick, processed: usize, remaining: usize) {
        info!(%tick, processed, remaining, "tick cut short");
    }

    fn on_region_report(&mut self, agent: AgentId, report: &RegionReport) {
        self.surveys += 1;
        info!(%agent, region = %report.region, sources = report.sources.len(), "region surveyed");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== xsmall: one-region colony ===");
    println!("Ticks: {TICKS}  |  Seed: {SEED}");
    println!();

    // 1. World.
    let mut world = build_world()?;

    // 2. Quotas from the embedded CSV.
    let quotas = load_quotas_reader(Cursor::new(QUOTAS_CSV))?;
    println!("Loaded {} spawn quotas", quotas.len());

    // 3. Colony.
    let config = ColonyConfig { cpu_budget_ms: Some(20), ..ColonyConfig::seeded(SEED) };
    let mut colony = ColonyBuilder::new(config).quotas(quotas).build()?;

    // 4. Run.
    let mut obs = Tally::default();
    let t0 = Instant::now();
    for _ in 0..TICKS {
        colony.run_tick(&mut world, &mut obs)?;
        world.end_tick();
    }
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!("Ran {TICKS} ticks in {:.3} s", elapsed.as_secs_f64());
    println!("  agents spawned     : {}", obs.spawned);
    println!("  status transitions : {}", obs.transitions);
    if let Some(last) = obs.last {
        println!("  last tick          : {} ({} agents evaluated)", last.tick, last.processed);
    }
    for controller in world.entities_in(HOME, EntityKind::Controller) {
        println!("  controller progress: {}", controller.progress);
    }
    println!("  region surveys     : {}", obs.surveys);
    for report in colony.regions.iter() {
        let owner = match report.controller {
            Some(c) if c.owned => "ours",
            Some(_) => "unowned",
            None => "no controller",
        };
        println!("  {} at {}: {} source(s), {owner}", report.region, report.seen, report.sources.len());
    }
    println!();

    // 6. Final roster.
    println!("{:<8} {:<16} {:<10} {:<18} {:<6}", "Agent", "Role", "Status", "Position", "Energy");
    println!("{}", "-".repeat(62));
    for (id, memory) in colony.agents.iter() {
        let Some(body) = world.agent(id) else { continue };
        println!(
            "{:<8} {:<16} {:<10} {:<18} {:<6}",
            id.0,
            memory.role,
            memory.status.map_or("-", |s| s.label()),
            body.pos.to_string(),
            body.store.get(hive_core::ResourceKind::Energy),
        );
    }

    Ok(())
}
