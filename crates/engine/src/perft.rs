/// Performance test (perft) for move-generation validation.
///
/// Perft counts all move paths of a given depth. Comparing the counts
/// against canonical draughts-100 values is the gold standard for
/// validating the generator, maximum-capture filtering included.
use crate::board::Position;
use crate::movegen::gen_moves;

/// Count all move sequences of length `depth`.
///
/// # Example
/// ```
/// use engine::board::Position;
/// use engine::perft::perft;
///
/// let pos = Position::initial();
/// assert_eq!(perft(&pos, 0), 1);
/// assert_eq!(perft(&pos, 1), 9);
/// assert_eq!(perft(&pos, 2), 81);
/// ```
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = gen_moves(pos);

    // At depth 1 the move count is the answer.
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        nodes += perft(&pos.do_move(m), depth - 1);
    }
    nodes
}

/// Perft with a per-move breakdown at the root, for pinpointing where a
/// generation bug hides when the totals disagree.
pub fn perft_divide(pos: &Position, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();
    for m in gen_moves(pos) {
        let count = if depth <= 1 {
            1
        } else {
            perft(&pos.do_move(&m), depth - 1)
        };
        results.push((m.to_string(), count));
    }
    results
}
