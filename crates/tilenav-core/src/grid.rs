//! The [`WalkGrid`] type: a dense walkability map over a tile [`Range`].
//!
//! Tiles outside the grid's bounds are never walkable.

use std::fmt;

use crate::geom::{Range, TilePos};

/// Character marking a walkable tile in [`WalkGrid::parse`] input.
pub const WALKABLE: char = '.';
/// Character marking a blocked tile in [`WalkGrid::parse`] input.
pub const BLOCKED: char = '#';

/// A 2D grid of walkable/blocked tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkGrid {
    bounds: Range,
    cells: Vec<bool>,
}

impl WalkGrid {
    /// Create a `width` × `height` grid where every tile is walkable.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, true)
    }

    /// Create a `width` × `height` grid with every tile set to `walkable`.
    pub fn filled(width: i32, height: i32, walkable: bool) -> Self {
        let bounds = Range::sized(width, height);
        Self {
            bounds,
            cells: vec![walkable; bounds.len()],
        }
    }

    /// Parse a grid from text rows: `.` is walkable, `#` is blocked.
    ///
    /// Leading and trailing blank lines are ignored; every remaining row
    /// must have the same width.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim)
            .skip_while(|l| l.is_empty())
            .collect();
        let rows: Vec<&str> = match rows.iter().rposition(|l| !l.is_empty()) {
            Some(last) => rows[..=last].to_vec(),
            None => Vec::new(),
        };

        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(GridError::InconsistentWidth {
                    row: y,
                    expected: width,
                    found: row.chars().count(),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    WALKABLE => cells.push(true),
                    BLOCKED => cells.push(false),
                    _ => {
                        return Err(GridError::InvalidChar {
                            ch,
                            pos: TilePos::new(x as i32, y as i32),
                        });
                    }
                }
            }
        }

        Ok(Self {
            bounds: Range::sized(width as i32, rows.len() as i32),
            cells,
        })
    }

    /// The bounding range of this grid.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Width of the grid.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Height of the grid.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    fn index(&self, p: TilePos) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.bounds.width() as usize + x)
    }

    /// Whether `p` is inside the grid and walkable.
    #[inline]
    pub fn is_walkable(&self, p: TilePos) -> bool {
        self.index(p).is_some_and(|i| self.cells[i])
    }

    /// Set the walkability of a tile. Out-of-bounds positions are ignored.
    pub fn set(&mut self, p: TilePos, walkable: bool) {
        if let Some(i) = self.index(p) {
            self.cells[i] = walkable;
        }
    }

    /// Set every tile of `footprint` (clipped to the grid) to `walkable`.
    pub fn fill(&mut self, footprint: Range, walkable: bool) {
        for p in footprint.intersect(self.bounds) {
            self.set(p, walkable);
        }
    }

    /// Number of walkable tiles.
    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

impl fmt::Display for WalkGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in self.bounds.min.y..self.bounds.max.y {
            for x in self.bounds.min.x..self.bounds.max.x {
                let ch = if self.is_walkable(TilePos::new(x, y)) {
                    WALKABLE
                } else {
                    BLOCKED
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Errors that can occur when parsing a [`WalkGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A row's width differs from the first row's.
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A character other than `.` or `#` was found.
    InvalidChar { ch: char, pos: TilePos },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentWidth {
                row,
                expected,
                found,
            } => write!(
                f,
                "walk grid: row {row} has width {found}, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(f, "walk grid contains invalid char \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
