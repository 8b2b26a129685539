/// Zobrist hashing for draughts positions.
///
/// Each occupied (square, piece) combination gets a precomputed random
/// 64-bit key; a position's hash is the XOR of the keys of its occupied
/// cells. Because the side to move is encoded in the cells themselves
/// (rotation, not a color flag), no separate side-to-move key is needed:
/// the board contents alone determine the key.
use crate::piece::Cell;
use crate::square::BOARD_SIZE;
use once_cell::sync::Lazy;

/// Occupied piece states per square: Man, King, OppMan, OppKing.
const PIECE_STATES: usize = 4;

/// Zobrist keys, one per square and occupied piece state.
pub struct ZobristKeys {
    pieces: [[u64; PIECE_STATES]; BOARD_SIZE],
}

/// Generate pseudorandom 64-bit numbers using a simple LCG.
const fn prng(mut seed: u64) -> u64 {
    // LCG parameters from Numerical Recipes
    seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    seed
}

const fn generate_keys() -> ZobristKeys {
    let mut keys = ZobristKeys {
        pieces: [[0; PIECE_STATES]; BOARD_SIZE],
    };
    // Fixed seed for reproducibility across runs.
    let mut seed: u64 = 0x00DA_0175_0BAD_5EED;
    let mut square = 0;
    while square < BOARD_SIZE {
        let mut state = 0;
        while state < PIECE_STATES {
            seed = prng(seed);
            keys.pieces[square][state] = seed;
            state += 1;
        }
        square += 1;
    }
    keys
}

/// Global Zobrist keys (initialized once at program start).
static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(generate_keys);

#[inline]
const fn state_index(cell: Cell) -> Option<usize> {
    match cell {
        Cell::Man => Some(0),
        Cell::King => Some(1),
        Cell::OppMan => Some(2),
        Cell::OppKing => Some(3),
        Cell::Empty | Cell::Off => None,
    }
}

/// Calculate the hash of a cell array.
pub fn hash_cells(cells: &[Cell; BOARD_SIZE]) -> u64 {
    let mut hash = 0u64;
    for (index, &cell) in cells.iter().enumerate() {
        if let Some(state) = state_index(cell) {
            hash ^= ZOBRIST.pieces[index][state];
        }
    }
    hash
}
