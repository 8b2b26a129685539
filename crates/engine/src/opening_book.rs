//! Opening book: position frequencies harvested from game openings.
//!
//! The book is a table of position hashes with the number of book lines
//! passing through each position. At play time the engine picks the legal
//! move whose successor is most frequent in the book. Loading happens once
//! at startup; lookups are read-only during play.

use crate::board::Position;
use crate::movegen::{gen_moves, match_move};
use crate::piece::Side;
use crate::r#move::Move;
use crate::{io, io::ParseError};
use std::collections::HashMap;
use tracing::warn;

pub struct OpeningBook {
    positions: HashMap<u64, u32>,
}

impl OpeningBook {
    pub fn new() -> Self {
        OpeningBook {
            positions: HashMap::new(),
        }
    }

    /// Load openings from text: one line per opening, whitespace-separated
    /// moves in numeric notation, optionally prefixed with move numbers
    /// (`1.`, `12.`), colors alternating from White's initial position.
    ///
    /// Lines that fail to parse or contain an illegal move are skipped
    /// with a warning. Returns the number of lines accepted.
    pub fn load(&mut self, text: &str) -> usize {
        let mut accepted = 0;
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.trace_line(line) {
                Ok(hashes) => {
                    for hash in hashes {
                        *self.positions.entry(hash).or_insert(0) += 1;
                    }
                    accepted += 1;
                }
                Err(err) => {
                    warn!(line = number + 1, %err, "skipping book line");
                }
            }
        }
        accepted
    }

    /// Play one book line from the initial position, collecting the hash
    /// of every position reached.
    fn trace_line(&self, line: &str) -> Result<Vec<u64>, ParseError> {
        let mut pos = Position::initial();
        let mut side = Side::White;
        let mut hashes = Vec::new();
        for token in line.split_whitespace() {
            // Strip a leading move number ("3.32-28" or a bare "3.").
            let token = match token.rsplit_once('.') {
                Some((_, rest)) => rest,
                None => token,
            };
            if token.is_empty() {
                continue;
            }
            let mut steps = io::parse_steps(token)?;
            if side == Side::Black {
                // Notation is absolute; Black's frame is the mirror image.
                for step in &mut steps {
                    *step = step.mirror();
                }
            }
            let m = match_move(&pos, &steps)
                .ok_or_else(|| ParseError::InvalidMove(token.to_string()))?;
            pos = pos.do_move(&m);
            side = side.opponent();
            hashes.push(pos.hash());
        }
        Ok(hashes)
    }

    /// The legal move of `pos` leading to the most frequent book
    /// position, if any successor is in the book at all.
    pub fn probe(&self, pos: &Position) -> Option<Move> {
        let mut best: Option<(u32, Move)> = None;
        for m in gen_moves(pos) {
            let frequency = self.frequency(&pos.do_move(&m));
            if frequency == 0 {
                continue;
            }
            let better = best.as_ref().map_or(true, |(f, _)| frequency > *f);
            if better {
                best = Some((frequency, m));
            }
        }
        best.map(|(_, m)| m)
    }

    /// How many book lines pass through `pos`.
    pub fn frequency(&self, pos: &Position) -> u32 {
        self.positions.get(&pos.hash()).copied().unwrap_or(0)
    }

    /// Check if a position is in the book.
    pub fn contains(&self, pos: &Position) -> bool {
        self.positions.contains_key(&pos.hash())
    }

    /// Get number of positions in the book.
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::square::Square;

    #[test]
    fn empty_book_probes_nothing() {
        let book = OpeningBook::new();
        assert!(book.is_empty());
        assert!(book.probe(&Position::initial()).is_none());
    }

    #[test]
    fn load_counts_lines_and_positions() {
        let mut book = OpeningBook::new();
        let accepted = book.load(
            "1. 32-28 18-23 2. 38-32\n\
             1. 32-28 19-23\n\
             \n\
             1. 33-28 17-22 2. 28x17 11x22\n",
        );
        assert_eq!(accepted, 3);
        assert!(book.size() > 0);

        // Both 32-28 lines pass through the same position after one move.
        let after = Position::initial().do_move(
            &match_move(
                &Position::initial(),
                &[Square::new(32), Square::new(28)],
            )
            .unwrap(),
        );
        assert_eq!(book.frequency(&after), 2);
        assert!(book.contains(&after));
    }

    #[test]
    fn probe_follows_the_most_frequent_line() {
        let mut book = OpeningBook::new();
        book.load("1. 32-28 18-23\n1. 32-28 19-24\n1. 33-29 19-23\n");
        let m = book.probe(&Position::initial()).expect("book move");
        assert_eq!(m.to_string(), "32-28");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut book = OpeningBook::new();
        // 31-28 is no legal opening move and the second line is noise.
        let accepted = book.load("1. 31-28 18-23\nhello world\n1. 32-28\n");
        assert_eq!(accepted, 1);
    }

    #[test]
    fn black_replies_are_read_in_absolute_numbering() {
        let mut book = OpeningBook::new();
        assert_eq!(book.load("1. 32-28 18-23"), 1);
        // After 32-28, Black's 18-23 must be found in the rotated frame.
        let start = Position::initial();
        let white = match_move(&start, &[Square::new(32), Square::new(28)]).unwrap();
        let after_white = start.do_move(&white);
        let black = match_move(
            &after_white,
            &[Square::new(18).mirror(), Square::new(23).mirror()],
        )
        .unwrap();
        let after_black = after_white.do_move(&black);
        assert!(book.contains(&after_black));
    }
}
