//! Diagonal neighbor tables for the 10x10 board.
//!
//! For every playable square and each of the four diagonal directions the
//! tables give the adjacent square in that direction, or nothing at the
//! board edge. They are built once at startup and shared read-only.

use crate::square::{Square, BOARD_SIZE};
use once_cell::sync::Lazy;

/// A diagonal direction. North is toward the promotion row (squares 1-5)
/// of the side to move.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// All four directions, in a fixed enumeration order
    pub const ALL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// The two forward directions for a man of the side to move
    pub const FORWARD: [Direction; 2] = [Direction::NorthEast, Direction::NorthWest];

    #[inline]
    const fn row_step(self) -> i8 {
        match self {
            Direction::NorthEast | Direction::NorthWest => -1,
            Direction::SouthEast | Direction::SouthWest => 1,
        }
    }

    #[inline]
    const fn col_step(self) -> i8 {
        match self {
            Direction::NorthEast | Direction::SouthEast => 1,
            Direction::NorthWest | Direction::SouthWest => -1,
        }
    }

    #[inline]
    const fn table_index(self) -> usize {
        match self {
            Direction::NorthEast => 0,
            Direction::NorthWest => 1,
            Direction::SouthEast => 2,
            Direction::SouthWest => 3,
        }
    }
}

/// The four neighbor tables. Entry 0 means "no neighbor" (board edge);
/// the sentinel indices 0 and 51 also hold 0.
pub struct Geometry {
    tables: [[u8; BOARD_SIZE]; 4],
}

impl Geometry {
    fn build() -> Self {
        let mut tables = [[0u8; BOARD_SIZE]; 4];
        for sq in Square::all() {
            for dir in Direction::ALL {
                let row = sq.row() as i8 + dir.row_step();
                let col = sq.col() as i8 + dir.col_step();
                if let Some(next) = Square::from_grid(row, col) {
                    tables[dir.table_index()][sq.index()] = next.number();
                }
            }
        }
        Geometry { tables }
    }

    /// The adjacent square in the given direction, or None at the edge
    #[inline]
    pub fn neighbor(&self, sq: Square, dir: Direction) -> Option<Square> {
        Square::try_new(self.tables[dir.table_index()][sq.index()])
    }

    /// Walk the diagonal from `sq` in direction `dir`, excluding `sq`
    /// itself, stopping at the board edge. At most 9 squares.
    pub fn ray(&self, sq: Square, dir: Direction) -> Ray<'_> {
        Ray {
            geometry: self,
            current: sq,
            dir,
        }
    }
}

/// Lazy iterator over a diagonal walk. See [`Geometry::ray`].
pub struct Ray<'a> {
    geometry: &'a Geometry,
    current: Square,
    dir: Direction,
}

impl Iterator for Ray<'_> {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let next = self.geometry.neighbor(self.current, self.dir)?;
        self.current = next;
        Some(next)
    }
}

/// Global geometry tables (built once at first use).
pub static GEOMETRY: Lazy<Geometry> = Lazy::new(Geometry::build);

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(n: u8) -> Square {
        Square::new(n)
    }

    #[test]
    fn neighbors_of_central_square() {
        // 28 sits in the middle of the board with all four neighbors.
        assert_eq!(GEOMETRY.neighbor(sq(28), Direction::NorthEast), Some(sq(23)));
        assert_eq!(GEOMETRY.neighbor(sq(28), Direction::NorthWest), Some(sq(22)));
        assert_eq!(GEOMETRY.neighbor(sq(28), Direction::SouthEast), Some(sq(33)));
        assert_eq!(GEOMETRY.neighbor(sq(28), Direction::SouthWest), Some(sq(32)));
    }

    #[test]
    fn neighbors_at_edges() {
        // 35 is on the right edge; no square to the north-east.
        assert_eq!(GEOMETRY.neighbor(sq(35), Direction::NorthEast), None);
        assert_eq!(GEOMETRY.neighbor(sq(35), Direction::NorthWest), Some(sq(30)));
        // 26 is on the left edge.
        assert_eq!(GEOMETRY.neighbor(sq(26), Direction::NorthWest), None);
        assert_eq!(GEOMETRY.neighbor(sq(26), Direction::NorthEast), Some(sq(21)));
        // Promotion row has no northern neighbors at all for square 1's NW.
        assert_eq!(GEOMETRY.neighbor(sq(1), Direction::NorthWest), None);
        assert_eq!(GEOMETRY.neighbor(sq(46), Direction::SouthWest), None);
    }

    #[test]
    fn neighbor_mirrors_under_rotation() {
        // Rotating the board maps NE walks onto SW walks of the mirror.
        for s in Square::all() {
            let ne = GEOMETRY.neighbor(s, Direction::NorthEast);
            let sw = GEOMETRY.neighbor(s.mirror(), Direction::SouthWest);
            assert_eq!(ne.map(Square::mirror), sw);
        }
    }

    #[test]
    fn rays_are_finite_and_short() {
        for s in Square::all() {
            for dir in Direction::ALL {
                let len = GEOMETRY.ray(s, dir).count();
                assert!(len <= 9, "ray from {} too long: {}", s, len);
            }
        }
    }

    #[test]
    fn long_diagonal_ray() {
        let walk: Vec<u8> = GEOMETRY
            .ray(sq(46), Direction::NorthEast)
            .map(Square::number)
            .collect();
        assert_eq!(walk, vec![41, 37, 32, 28, 23, 19, 14, 10, 5]);
    }
}
