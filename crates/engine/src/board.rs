//! Board state and incremental evaluation.
//!
//! A [`Position`] is a length-52 cell array plus a running score. The score
//! is always the static evaluation from the side to move's point of view;
//! [`Position::do_move`] keeps it current incrementally so search never has
//! to evaluate from scratch.

use crate::eval;
use crate::piece::Cell;
use crate::r#move::Move;
use crate::square::{Square, BOARD_SIZE};
use crate::zobrist;

/// A draughts position, always seen from the side to move.
///
/// Uppercase cells (`Man`, `King`) belong to the side to move. Applying a
/// move returns the *rotated* successor, so the result is again seen from
/// the (new) side to move. The two sentinel entries at indices 0 and 51
/// are [`Cell::Off`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    cells: [Cell; BOARD_SIZE],
    score: i32,
}

impl Position {
    /// Build a position from a cell array, computing the score from
    /// scratch. The sentinel entries are forced to [`Cell::Off`].
    pub fn from_cells(mut cells: [Cell; BOARD_SIZE]) -> Self {
        cells[0] = Cell::Off;
        cells[BOARD_SIZE - 1] = Cell::Off;
        let mut pos = Position { cells, score: 0 };
        pos.score = pos.evaluate();
        pos
    }

    /// The initial draughts-100 position: twenty men per side, side to
    /// move on squares 31-50.
    pub fn initial() -> Self {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for n in 1..=20 {
            cells[n] = Cell::OppMan;
        }
        for n in 31..=50 {
            cells[n] = Cell::Man;
        }
        Position::from_cells(cells)
    }

    /// The full cell array, sentinels included.
    #[inline]
    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    /// The cell on a playable square.
    #[inline]
    pub fn cell(&self, sq: Square) -> Cell {
        self.cells[sq.index()]
    }

    /// The running evaluation, from the side to move's point of view.
    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// The 64-bit key of this position, a function of the cells alone.
    #[inline]
    pub fn hash(&self) -> u64 {
        zobrist::hash_cells(&self.cells)
    }

    /// The same position seen from the other side: the board reversed with
    /// every cell case-swapped, and the score negated. An involution.
    pub fn rotate(&self) -> Position {
        let mut cells = [Cell::Off; BOARD_SIZE];
        for i in 0..BOARD_SIZE {
            cells[i] = self.cells[BOARD_SIZE - 1 - i].swapped();
        }
        Position {
            cells,
            score: -self.score,
        }
    }

    /// Apply a move and return the successor from the opponent's
    /// perspective.
    ///
    /// The moving piece is lifted from the origin and placed on the final
    /// landing square, promoting a man that ends on the promotion row;
    /// captured pieces are removed only now, after the whole chain. The
    /// score is updated incrementally before the rotation.
    pub fn do_move(&self, m: &Move) -> Position {
        let from = m.from();
        let to = m.to();
        let mut cells = self.cells;
        let piece = cells[from.index()];
        cells[from.index()] = Cell::Empty;
        cells[to.index()] = if piece == Cell::Man && to.is_promotion() {
            Cell::King
        } else {
            piece
        };
        for take in m.takes() {
            cells[take.index()] = Cell::Empty;
        }
        Position {
            cells,
            score: self.score + self.eval_move(m),
        }
        .rotate()
    }

    /// Score delta that [`Position::do_move`] would add for `m`, without
    /// applying it.
    ///
    /// Captured pieces are credited at their value on the mirrored square
    /// `51 - k`, since their tables are written from the opponent's frame.
    pub fn eval_move(&self, m: &Move) -> i32 {
        let from = m.from();
        let to = m.to();
        let piece = self.cells[from.index()];
        let to_value = if piece == Cell::Man && to.is_promotion() {
            eval::piece_value(Cell::King, to)
        } else {
            eval::piece_value(piece, to)
        };
        let mut delta = to_value - eval::piece_value(piece, from);
        for &take in m.takes() {
            let captured = self.cells[take.index()].swapped();
            delta += eval::piece_value(captured, take.mirror());
        }
        delta
    }

    /// Static evaluation from scratch: the side to move's material and
    /// position minus the opponent's, both read through their own frames.
    /// Always equal to [`Position::score`]; used at construction and as a
    /// test oracle.
    pub fn evaluate(&self) -> i32 {
        fn side_total(cells: &[Cell; BOARD_SIZE]) -> i32 {
            Square::all()
                .map(|sq| {
                    let cell = cells[sq.index()];
                    if cell.is_own() {
                        eval::piece_value(cell, sq)
                    } else {
                        0
                    }
                })
                .sum()
        }
        side_total(&self.cells) - side_total(&self.rotate().cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(n: u8) -> Square {
        Square::new(n)
    }

    /// Build a position from (square, cell) pairs, everything else empty.
    fn position_with(pieces: &[(u8, Cell)]) -> Position {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for &(n, c) in pieces {
            cells[n as usize] = c;
        }
        Position::from_cells(cells)
    }

    #[test]
    fn initial_position_is_balanced() {
        let pos = Position::initial();
        assert_eq!(pos.score(), 0);
        assert_eq!(pos.evaluate(), 0);
        assert_eq!(pos.cell(sq(31)), Cell::Man);
        assert_eq!(pos.cell(sq(20)), Cell::OppMan);
        assert_eq!(pos.cell(sq(25)), Cell::Empty);
        assert_eq!(pos.cells()[0], Cell::Off);
        assert_eq!(pos.cells()[51], Cell::Off);
    }

    #[test]
    fn rotate_is_involution() {
        let pos = Position::initial();
        assert_eq!(pos.rotate().rotate(), pos);

        let lopsided = position_with(&[(28, Cell::Man), (19, Cell::OppKing), (47, Cell::King)]);
        assert_eq!(lopsided.rotate().rotate(), lopsided);
        assert_eq!(lopsided.rotate().score(), -lopsided.score());
    }

    #[test]
    fn rotate_mirrors_and_swaps() {
        let pos = position_with(&[(28, Cell::Man), (5, Cell::OppKing)]);
        let rot = pos.rotate();
        assert_eq!(rot.cell(sq(28).mirror()), Cell::OppMan);
        assert_eq!(rot.cell(sq(5).mirror()), Cell::King);
    }

    #[test]
    fn do_move_matches_eval_move() {
        let pos = position_with(&[(32, Cell::Man), (28, Cell::OppMan), (40, Cell::OppMan)]);
        let m = Move::capture(vec![sq(32), sq(23)], vec![sq(28)]);
        let next = pos.do_move(&m);
        // Un-rotating the child recovers the mover's frame.
        assert_eq!(next.rotate().score(), pos.score() + pos.eval_move(&m));
        // The capture landed and the victim is gone (seen from the opponent).
        assert_eq!(next.cell(sq(23).mirror()), Cell::OppMan);
        assert_eq!(next.cell(sq(28).mirror()), Cell::Empty);
        assert_eq!(next.cell(sq(32).mirror()), Cell::Empty);
    }

    #[test]
    fn do_move_keeps_score_incremental() {
        let pos = position_with(&[(32, Cell::Man), (28, Cell::OppMan), (19, Cell::OppMan)]);
        let m = Move::capture(vec![sq(32), sq(23), sq(14)], vec![sq(28), sq(19)]);
        let next = pos.do_move(&m);
        assert_eq!(next.score(), next.evaluate());
    }

    #[test]
    fn man_promotes_on_last_row() {
        let pos = position_with(&[(6, Cell::Man), (30, Cell::OppMan)]);
        let m = Move::step(sq(6), sq(1));
        let next = pos.do_move(&m);
        assert_eq!(next.cell(sq(1).mirror()), Cell::OppKing);
        assert_eq!(next.score(), next.evaluate());
    }

    #[test]
    fn king_does_not_re_promote() {
        let pos = position_with(&[(6, Cell::King), (30, Cell::OppMan)]);
        let next = pos.do_move(&Move::step(sq(6), sq(1)));
        assert_eq!(next.cell(sq(1).mirror()), Cell::OppKing);
    }

    #[test]
    fn promotion_value_is_priced_into_eval_move() {
        let pos = position_with(&[(6, Cell::Man), (30, Cell::OppMan)]);
        let m = Move::step(sq(6), sq(1));
        let gain = pos.eval_move(&m);
        // Gains the king material, loses the man's value on square 6.
        assert_eq!(
            gain,
            eval::piece_value(Cell::King, sq(1)) - eval::piece_value(Cell::Man, sq(6))
        );
    }

    #[test]
    fn hash_depends_on_cells_only() {
        let a = position_with(&[(28, Cell::Man)]);
        let b = position_with(&[(28, Cell::Man)]);
        let c = position_with(&[(29, Cell::Man)]);
        assert_eq!(a.hash(), b.hash());
        assert_ne!(a.hash(), c.hash());
        assert_ne!(a.hash(), a.rotate().hash());
    }
}
