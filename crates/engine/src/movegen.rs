//! Move generation under international draughts rules.
//!
//! The delicate part is capture generation: captures are mandatory, chains
//! must be extended as far as possible, and of all completed chains only
//! those capturing the maximum number of pieces are legal. During a chain
//! the captured pieces stay on the board (they block further jumps and may
//! not be jumped twice); they are removed only when the move is applied.

use crate::board::Position;
use crate::geometry::{Direction, GEOMETRY};
use crate::piece::Cell;
use crate::r#move::Move;
use crate::square::{Square, BOARD_SIZE};
use std::collections::HashMap;

/// Bound on the legal-move memoization cache.
pub const MOVE_TABLE_SIZE: usize = 1_000_000;

/// Generate the legal moves of a position.
///
/// If any capture exists, the result is exactly the completed capture
/// chains of maximal length; otherwise all basic non-capture moves.
/// Enumeration order is deterministic: squares in numbering order,
/// directions in [`Direction::ALL`] order.
pub fn gen_moves(pos: &Position) -> Vec<Move> {
    let mut captures = Vec::new();
    for sq in Square::all() {
        let piece = pos.cell(sq);
        if piece.is_own() {
            captures_from(pos, sq, piece, &mut captures);
        }
    }
    if !captures.is_empty() {
        let longest = captures.iter().map(|m| m.takes().len()).max().unwrap_or(0);
        captures.retain(|m| m.takes().len() == longest);
        return captures;
    }

    let mut moves = Vec::new();
    for sq in Square::all() {
        match pos.cell(sq) {
            Cell::Man => man_steps(pos, sq, &mut moves),
            Cell::King => king_steps(pos, sq, &mut moves),
            _ => {}
        }
    }
    moves
}

/// True when the side to move has at least one capture anywhere.
///
/// Cheap test used by the search heuristics (null move, quiescence); it
/// never builds the chains.
pub fn has_capture(pos: &Position) -> bool {
    for sq in Square::all() {
        let piece = pos.cell(sq);
        if piece.is_own() && has_leg(pos.cells(), sq, piece, &[]) {
            return true;
        }
    }
    false
}

/// Match an externally supplied step list against the legal moves.
///
/// A two-square list matches on (origin, landing) only; a longer list must
/// equal a legal move's visited squares as a set. Returns the first match
/// in generation order, or None when the input corresponds to no legal
/// move.
pub fn match_move(pos: &Position, steps: &[Square]) -> Option<Move> {
    let legal = gen_moves(pos);
    if steps.len() == 2 {
        legal
            .into_iter()
            .find(|m| m.from() == steps[0] && m.to() == steps[1])
    } else {
        let mut wanted = steps.to_vec();
        wanted.sort_unstable();
        legal.into_iter().find(|m| {
            let mut visited = m.steps().to_vec();
            visited.sort_unstable();
            visited == wanted
        })
    }
}

/// Forward non-capture moves of a man.
fn man_steps(pos: &Position, from: Square, moves: &mut Vec<Move>) {
    for dir in Direction::FORWARD {
        if let Some(to) = GEOMETRY.neighbor(from, dir) {
            if pos.cell(to).is_empty() {
                moves.push(Move::step(from, to));
            }
        }
    }
}

/// Sliding non-capture moves of a king: every empty square along each
/// diagonal, stopping at the first occupied square or the edge.
fn king_steps(pos: &Position, from: Square, moves: &mut Vec<Move>) {
    for dir in Direction::ALL {
        for to in GEOMETRY.ray(from, dir) {
            if !pos.cell(to).is_empty() {
                break;
            }
            moves.push(Move::step(from, to));
        }
    }
}

/// Emit every completed capture chain starting on `from`.
fn captures_from(pos: &Position, from: Square, piece: Cell, out: &mut Vec<Move>) {
    // Work on a copy with the mover lifted off; captured pieces stay put
    // for the whole chain so they keep blocking.
    let mut cells = *pos.cells();
    cells[from.index()] = Cell::Empty;
    extend_chain(&cells, piece, vec![from], Vec::new(), out);
}

/// Recursive chain extension. A chain is emitted only once no admissible
/// one-leg continuation exists from its landing square.
fn extend_chain(
    cells: &[Cell; BOARD_SIZE],
    piece: Cell,
    steps: Vec<Square>,
    takes: Vec<Square>,
    out: &mut Vec<Move>,
) {
    let current = steps[steps.len() - 1];
    let legs = one_leg(cells, current, piece, &takes);
    if legs.is_empty() {
        if !takes.is_empty() {
            out.push(Move::capture(steps, takes));
        }
        return;
    }
    for (landing, take) in legs {
        let mut next_steps = steps.clone();
        next_steps.push(landing);
        let mut next_takes = takes.clone();
        next_takes.push(take);
        extend_chain(cells, piece, next_steps, next_takes, out);
    }
}

/// All admissible one-leg captures from `from`, as (landing, taken) pairs.
///
/// `taken` holds the squares already captured earlier in the chain: those
/// pieces may not be jumped again and, for a king, block the diagonal.
fn one_leg(
    cells: &[Cell; BOARD_SIZE],
    from: Square,
    piece: Cell,
    taken: &[Square],
) -> Vec<(Square, Square)> {
    let mut legs = Vec::new();
    for dir in Direction::ALL {
        match piece {
            Cell::Man => {
                let Some(over) = GEOMETRY.neighbor(from, dir) else {
                    continue;
                };
                if !cells[over.index()].is_opponent() || taken.contains(&over) {
                    continue;
                }
                let Some(landing) = GEOMETRY.neighbor(over, dir) else {
                    continue;
                };
                if cells[landing.index()].is_empty() {
                    legs.push((landing, over));
                }
            }
            Cell::King => {
                let mut pending: Option<Square> = None;
                for sq in GEOMETRY.ray(from, dir) {
                    let cell = cells[sq.index()];
                    if cell.is_empty() {
                        // Any empty square past the taken piece is a landing.
                        if let Some(take) = pending {
                            legs.push((sq, take));
                        }
                    } else if cell.is_opponent() {
                        if pending.is_some() || taken.contains(&sq) {
                            break;
                        }
                        pending = Some(sq);
                    } else {
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    legs
}

/// One-leg existence test, used by [`has_capture`].
fn has_leg(cells: &[Cell; BOARD_SIZE], from: Square, piece: Cell, taken: &[Square]) -> bool {
    !one_leg(cells, from, piece, taken).is_empty()
}

/// Bounded memoization of legal-move lists, keyed by position hash.
///
/// On overflow the whole cache is dropped; correctness never depends on it.
pub struct MoveCache {
    table: HashMap<u64, Vec<Move>>,
}

impl MoveCache {
    pub fn new() -> Self {
        MoveCache {
            table: HashMap::new(),
        }
    }

    /// The legal moves of `pos`, memoized.
    pub fn legal_moves(&mut self, pos: &Position) -> Vec<Move> {
        let key = pos.hash();
        if let Some(moves) = self.table.get(&key) {
            return moves.clone();
        }
        let moves = gen_moves(pos);
        if self.table.len() >= MOVE_TABLE_SIZE {
            self.table.clear();
        }
        self.table.insert(key, moves.clone());
        moves
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn clear(&mut self) {
        self.table.clear();
    }
}

impl Default for MoveCache {
    fn default() -> Self {
        Self::new()
    }
}
