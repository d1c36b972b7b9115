//! Compact serialized form of a movement path.
//!
//! # Layout
//!
//! ```text
//!   XXYY d d d …
//! ```
//!
//! `XXYY` is the zero-padded local coordinate of the path head (the next tile
//! to step onto) and each `d` is a direction code `'1'..='8'` leading to the
//! following tile.  The head carries no region: it is resolved against the
//! agent's current position as whichever of the current region and its eight
//! neighbours puts the tile closest to the agent.  A path only ever starts
//! one step away, so this is unambiguous.
//!
//! The string is always anchored at "where the agent steps next".  Consuming
//! a step ([`SerializedPath::advance`]) re-encodes the following tile as the
//! new head and drops the consumed direction code, so the remainder never has
//! to be replayed from the first tile.

use std::fmt;

use hive_core::{Direction, Position, REGION_SIZE, RegionId};

use crate::error::CodecError;

const HEAD_LEN: usize = 4;

/// A path in `XXYY` + direction-code form.  The empty string is the empty
/// path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct SerializedPath(String);

impl SerializedPath {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode every step of `path`.
    ///
    /// Steps must be between adjacent tiles; encoding stops at the first pair
    /// that is not.
    pub fn encode(path: &[Position]) -> Self {
        Self::encode_until(path, |_| true)
    }

    /// Encode `path`, stopping right after the first step that enters a
    /// region for which `visible` is `false`.
    ///
    /// The step into the unknown region is kept so the agent crosses the
    /// border, gains vision, and replans from there.
    pub fn encode_until(path: &[Position], visible: impl Fn(RegionId) -> bool) -> Self {
        let Some(&head) = path.first() else {
            return Self::empty();
        };
        let mut s = String::with_capacity(HEAD_LEN + path.len() - 1);
        push_head(&mut s, head);

        for pair in path.windows(2) {
            let Some(dir) = pair[0].direction_to(pair[1]).filter(|_| pair[0].range_to(pair[1]) == 1) else {
                break;
            };
            s.push(dir.code());
            if !visible(pair[1].region) {
                break;
            }
        }
        Self(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Direction codes after the head.  A head-only path has 0 steps left
    /// after the head itself.
    pub fn remaining_steps(&self) -> usize {
        self.0.len().saturating_sub(HEAD_LEN)
    }

    /// The head tile, resolved relative to `current`.  `None` for the empty
    /// path.
    pub fn next_step(&self, current: Position) -> Result<Option<Position>, CodecError> {
        if self.is_empty() {
            return Ok(None);
        }
        let (x, y) = self.head()?;
        Ok(Some(resolve_head(current, x, y)))
    }

    /// Every tile on the path, head first.
    pub fn decode(&self, current: Position) -> Result<Vec<Position>, CodecError> {
        let Some(mut pos) = self.next_step(current)? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(self.remaining_steps() + 1);
        out.push(pos);
        for (i, c) in self.0[HEAD_LEN..].char_indices() {
            let dir = Direction::from_code(c).ok_or(CodecError::BadDirection { code: c, offset: HEAD_LEN + i })?;
            pos = pos.step(dir);
            out.push(pos);
        }
        Ok(out)
    }

    /// Consume the head: the tile after it becomes the new head and its
    /// direction code is dropped.  A head-only path advances to empty.
    pub fn advance(&self, current: Position) -> Result<SerializedPath, CodecError> {
        let Some(head) = self.next_step(current)? else {
            return Ok(Self::empty());
        };
        let Some(c) = self.0[HEAD_LEN..].chars().next() else {
            return Ok(Self::empty());
        };
        let dir = Direction::from_code(c).ok_or(CodecError::BadDirection { code: c, offset: HEAD_LEN })?;
        let mut s = String::with_capacity(self.0.len() - 1);
        push_head(&mut s, head.step(dir));
        s.push_str(&self.0[HEAD_LEN + 1..]);
        Ok(Self(s))
    }

    fn head(&self) -> Result<(u8, u8), CodecError> {
        let s = &self.0;
        if s.len() < HEAD_LEN || !s.is_char_boundary(HEAD_LEN) {
            return Err(CodecError::TooShort(s.clone()));
        }
        let b = s.as_bytes();
        match (two_digits(b[0], b[1]), two_digits(b[2], b[3])) {
            (Some(x), Some(y)) => Ok((x, y)),
            _ => Err(CodecError::BadHead(s[..HEAD_LEN].to_owned())),
        }
    }
}

impl From<String> for SerializedPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<SerializedPath> for String {
    fn from(p: SerializedPath) -> String {
        p.0
    }
}

impl fmt::Display for SerializedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn push_head(s: &mut String, p: Position) {
    use std::fmt::Write;
    let _ = write!(s, "{:02}{:02}", p.x, p.y);
}

fn two_digits(hi: u8, lo: u8) -> Option<u8> {
    if !hi.is_ascii_digit() || !lo.is_ascii_digit() {
        return None;
    }
    let v = (hi - b'0') * 10 + (lo - b'0');
    (v < REGION_SIZE).then_some(v)
}

/// Pick the region (current or a neighbour) that puts local `(x, y)` closest
/// to `current`.  Ties favour the current region.
fn resolve_head(current: Position, x: u8, y: u8) -> Position {
    let mut best = Position::new(current.region, x, y);
    let mut best_range = current.range_to(best);
    for dy in -1..=1 {
        for dx in -1..=1 {
            let Some(region) = current.region.offset(dx, dy) else { continue };
            let cand = Position::new(region, x, y);
            let r = current.range_to(cand);
            if r < best_range {
                best = cand;
                best_range = r;
            }
        }
    }
    best
}
