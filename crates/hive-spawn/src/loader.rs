//! CSV quota loader.
//!
//! # CSV format
//!
//! One row per quota.  `per_source` defaults to `false`; `remote` names the
//! region agents produced for the quota work in and may be left empty.
//!
//! ```csv
//! role,home,minimum,per_source,remote
//! harvester,W1N1,1,true,
//! hauler,W1N1,1,true,
//! nurse,W1N1,2,false,
//! upgrader,W1N1,3,,
//! pillager,W1N1,1,false,W2N1
//! ```
//!
//! `role` is matched case-insensitively against the role names; `home` is a
//! region name such as `W1N1` or `E0S3`.  A repeated `(role, home)` pair
//! replaces the earlier row.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use hive_agent::Role;
use hive_core::RegionId;

use crate::{QuotaTable, SpawnError, SpawnQuota};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct QuotaRecord {
    role:       String,
    home:       String,
    minimum:    u32,
    #[serde(default)]
    per_source: Option<bool>,
    #[serde(default)]
    remote:     Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`QuotaTable`] from a CSV file.
pub fn load_quotas_csv(path: &Path) -> Result<QuotaTable, SpawnError> {
    let file = std::fs::File::open(path).map_err(SpawnError::Io)?;
    load_quotas_reader(file)
}

/// Like [`load_quotas_csv`] but accepts any `Read` source.
pub fn load_quotas_reader<R: Read>(reader: R) -> Result<QuotaTable, SpawnError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = QuotaTable::new();

    for (i, result) in csv_reader.deserialize::<QuotaRecord>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let row = result.map_err(|e| SpawnError::Parse(e.to_string()))?;
        let role: Role = row
            .role
            .parse()
            .map_err(|e| SpawnError::Parse(format!("line {line}: {e}")))?;
        let home: RegionId = row
            .home
            .parse()
            .map_err(|e| SpawnError::Parse(format!("line {line}: {e}")))?;
        let remote = match row.remote.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(
                name.parse::<RegionId>()
                    .map_err(|e| SpawnError::Parse(format!("line {line}: {e}")))?,
            ),
        };
        table.push(SpawnQuota {
            role,
            home,
            minimum: row.minimum,
            per_source: row.per_source.unwrap_or(false),
            remote,
        });
    }

    Ok(table)
}
