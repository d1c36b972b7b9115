//! Tile-grid geometry: regions, positions, and compass directions.
//!
//! # Coordinate model
//!
//! The world is a plane of fixed-size square regions, each `REGION_SIZE`
//! tiles wide.  A region is addressed by signed coordinates and named the way
//! players read it off the map:
//!
//! ```text
//!   x ≥ 0 → E{x}      x < 0 → W{-x-1}
//!   y ≥ 0 → S{y}      y < 0 → N{-y-1}
//! ```
//!
//! so `W0` sits directly west of `E0` and `N0` directly north of `S0`.
//!
//! World coordinates are contiguous across region borders:
//!
//!   world_x = region.x * REGION_SIZE + x
//!
//! which means tile `x = 49` of one region is adjacent to tile `x = 0` of its
//! eastern neighbour.  All distances are Chebyshev distances in world space.

use std::fmt;
use std::str::FromStr;

use crate::HiveError;

/// Width and height of every region, in tiles.
pub const REGION_SIZE: u8 = 50;

const SIZE: i32 = REGION_SIZE as i32;

/// Largest region number a name may carry (`E{n}`, `W{n}`, `N{n}`, `S{n}`).
/// Keeps every region and its neighbours inside `i16`.
pub const MAX_REGION_INDEX: i32 = 16_000;

// ── RegionId ──────────────────────────────────────────────────────────────────

/// A named region of the world map.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RegionId {
    pub x: i16,
    pub y: i16,
}

impl RegionId {
    #[inline]
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// The region `dx`, `dy` regions away from `self`, or `None` past the
    /// edge of the coordinate space.
    #[inline]
    pub fn offset(self, dx: i16, dy: i16) -> Option<Self> {
        Some(Self { x: self.x.checked_add(dx)?, y: self.y.checked_add(dy)? })
    }

    /// The four regions sharing an edge with this one, clockwise from north.
    pub fn neighbors(self) -> impl Iterator<Item = RegionId> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)].into_iter().filter_map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// The tile at the centre of this region.
    #[inline]
    pub fn center(self) -> Position {
        Position::new(self, REGION_SIZE / 2, REGION_SIZE / 2)
    }

    /// Chebyshev distance between two regions, in regions.
    pub fn distance(self, other: RegionId) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx.max(dy)
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, hx) = if self.x >= 0 { ('E', self.x as i32) } else { ('W', -(self.x as i32) - 1) };
        let (v, vy) = if self.y >= 0 { ('S', self.y as i32) } else { ('N', -(self.y as i32) - 1) };
        write!(f, "{h}{hx}{v}{vy}")
    }
}

impl FromStr for RegionId {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || HiveError::InvalidRegionName(s.to_owned());

        let s_trim = s.trim();
        if !s_trim.is_ascii() {
            return Err(bad());
        }
        let h = s_trim.chars().next().ok_or_else(bad)?;
        let split = s_trim[1..]
            .find(['N', 'S', 'n', 's'])
            .map(|i| i + 1)
            .ok_or_else(bad)?;

        let hn = parse_count(&s_trim[1..split]).ok_or_else(bad)?;
        let v = s_trim[split..].chars().next().ok_or_else(bad)?;
        let vn = parse_count(&s_trim[split + 1..]).ok_or_else(bad)?;

        let x = match h.to_ascii_uppercase() {
            'E' => hn,
            'W' => -hn - 1,
            _ => return Err(bad()),
        };
        let y = match v.to_ascii_uppercase() {
            'S' => vn,
            'N' => -vn - 1,
            _ => return Err(bad()),
        };

        let x = i16::try_from(x).map_err(|_| bad())?;
        let y = i16::try_from(y).map_err(|_| bad())?;
        Ok(RegionId { x, y })
    }
}

/// Unsigned decimal digits only (no sign, no whitespace), at most
/// [`MAX_REGION_INDEX`].
fn parse_count(s: &str) -> Option<i32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok().filter(|&n| n <= MAX_REGION_INDEX)
}

impl TryFrom<String> for RegionId {
    type Error = HiveError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RegionId> for String {
    fn from(r: RegionId) -> String {
        r.to_string()
    }
}

// ── Direction ─────────────────────────────────────────────────────────────────

/// One of the 8 compass directions an agent can step in.
///
/// The discriminants double as the single-character codes used by the
/// serialized path format (`'1'` = Top … `'8'` = TopLeft).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    Top         = 1,
    TopRight    = 2,
    Right       = 3,
    BottomRight = 4,
    Bottom      = 5,
    BottomLeft  = 6,
    Left        = 7,
    TopLeft     = 8,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Top,
        Direction::TopRight,
        Direction::Right,
        Direction::BottomRight,
        Direction::Bottom,
        Direction::BottomLeft,
        Direction::Left,
        Direction::TopLeft,
    ];

    /// `(dx, dy)` unit offset; y grows downward.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Top         => (0, -1),
            Direction::TopRight    => (1, -1),
            Direction::Right       => (1, 0),
            Direction::BottomRight => (1, 1),
            Direction::Bottom      => (0, 1),
            Direction::BottomLeft  => (-1, 1),
            Direction::Left        => (-1, 0),
            Direction::TopLeft     => (-1, -1),
        }
    }

    /// Direction matching the signs of `(dx, dy)`, or `None` for `(0, 0)`.
    pub fn from_offset(dx: i32, dy: i32) -> Option<Direction> {
        match (dx.signum(), dy.signum()) {
            (0, -1)  => Some(Direction::Top),
            (1, -1)  => Some(Direction::TopRight),
            (1, 0)   => Some(Direction::Right),
            (1, 1)   => Some(Direction::BottomRight),
            (0, 1)   => Some(Direction::Bottom),
            (-1, 1)  => Some(Direction::BottomLeft),
            (-1, 0)  => Some(Direction::Left),
            (-1, -1) => Some(Direction::TopLeft),
            _        => None,
        }
    }

    /// The path-format character for this direction.
    #[inline]
    pub fn code(self) -> char {
        char::from(b'0' + self as u8)
    }

    /// Parse a path-format character.
    pub fn from_code(c: char) -> Option<Direction> {
        match c {
            '1' => Some(Direction::Top),
            '2' => Some(Direction::TopRight),
            '3' => Some(Direction::Right),
            '4' => Some(Direction::BottomRight),
            '5' => Some(Direction::Bottom),
            '6' => Some(Direction::BottomLeft),
            '7' => Some(Direction::Left),
            '8' => Some(Direction::TopLeft),
            _   => None,
        }
    }
}

// ── Position ──────────────────────────────────────────────────────────────────

/// A tile inside a region.  `x` and `y` are always `< REGION_SIZE`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub region: RegionId,
    pub x: u8,
    pub y: u8,
}

impl Position {
    #[inline]
    pub fn new(region: RegionId, x: u8, y: u8) -> Self {
        debug_assert!(x < REGION_SIZE && y < REGION_SIZE, "tile ({x},{y}) outside region");
        Self { region, x, y }
    }

    #[inline]
    pub fn world_x(self) -> i32 {
        self.region.x as i32 * SIZE + self.x as i32
    }

    #[inline]
    pub fn world_y(self) -> i32 {
        self.region.y as i32 * SIZE + self.y as i32
    }

    /// Inverse of [`world_x`](Self::world_x) / [`world_y`](Self::world_y).
    pub fn from_world(wx: i32, wy: i32) -> Self {
        Self {
            region: RegionId {
                x: wx.div_euclid(SIZE) as i16,
                y: wy.div_euclid(SIZE) as i16,
            },
            x: wx.rem_euclid(SIZE) as u8,
            y: wy.rem_euclid(SIZE) as u8,
        }
    }

    /// Chebyshev distance in tiles, across region borders.
    #[inline]
    pub fn range_to(self, other: Position) -> u32 {
        let dx = (self.world_x() - other.world_x()).unsigned_abs();
        let dy = (self.world_y() - other.world_y()).unsigned_abs();
        dx.max(dy)
    }

    #[inline]
    pub fn in_range_to(self, other: Position, range: u32) -> bool {
        self.range_to(other) <= range
    }

    /// Direction of the first step from `self` towards `other`.
    pub fn direction_to(self, other: Position) -> Option<Direction> {
        Direction::from_offset(other.world_x() - self.world_x(), other.world_y() - self.world_y())
    }

    /// The adjacent tile in direction `dir` (possibly in a neighbouring region).
    #[inline]
    pub fn step(self, dir: Direction) -> Position {
        let (dx, dy) = dir.offset();
        Position::from_world(self.world_x() + dx, self.world_y() + dy)
    }

    /// `true` on the outermost ring of tiles, where regions connect.
    #[inline]
    pub fn is_edge(self) -> bool {
        self.x == 0 || self.y == 0 || self.x == REGION_SIZE - 1 || self.y == REGION_SIZE - 1
    }

    /// All 8 neighbouring tiles, paired with the direction leading to them.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, Position)> {
        Direction::ALL.into_iter().map(move |d| (d, self.step(d)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {},{}]", self.region, self.x, self.y)
    }
}

// ── Terrain ───────────────────────────────────────────────────────────────────

/// Static terrain classification of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Plain,
    Swamp,
    Wall,
}

impl Terrain {
    #[inline]
    pub fn is_walkable(self) -> bool {
        !matches!(self, Terrain::Wall)
    }
}
