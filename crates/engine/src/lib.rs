//! # Draughts Engine Core
//!
//! An engine for international draughts (10x10 board, draughts-100
//! rules) featuring:
//! - Rule-complete move generation, including the maximum-capture rule
//!   and long-range king capture chains
//! - A rotating side-to-move board representation with incremental
//!   evaluation (no color flag anywhere)
//! - Three searchers over private transposition tables: MTD-bi (the
//!   workhorse), a forced-variation probe, and aspiration alpha-beta
//! - FEN and board-literal parsing, numeric move notation, and a
//!   frequency-based opening book
//!
//! ## Quick Start
//!
//! ```
//! use engine::board::Position;
//! use engine::Engine;
//!
//! let mut engine = Engine::new();
//! let pos = Position::initial();
//!
//! // Pick a move within the configured node budget.
//! let result = engine.best_move(&pos);
//! let m = result.best_move.expect("the start position is not terminal");
//!
//! // Apply it; the successor is seen from the opponent's side.
//! let next = pos.do_move(&m);
//! assert_eq!(next.score(), -(pos.score() + pos.eval_move(&m)));
//! ```
//!
//! ## Core Modules
//!
//! - [`board`] - Position, rotation, incremental evaluation
//! - [`square`] - Square numbering and the 52-entry array convention
//! - [`piece`] - Cell alphabet (side to move is uppercase)
//! - [`geometry`] - Diagonal neighbor tables
//! - [`movegen`] - Legal moves under the maximum-capture rule
//! - [`eval`] - Material values and piece-square tables
//! - [`zobrist`] - Position hashing
//! - [`tt`] - Bounded transposition tables
//! - [`search`] - The three searchers and PV reconstruction
//! - [`opening_book`] - Frequency book over opening lines
//! - [`io`] - FEN, board literals, numeric move notation
//! - [`perft`] - Move-generation validation

pub mod board;
pub mod eval;
pub mod geometry;
pub mod io;
#[allow(clippy::module_inception)]
pub mod r#move;
pub mod movegen;
pub mod opening_book;
pub mod perft;
pub mod piece;
pub mod search;
pub mod square;
pub mod tt;
pub mod types;
pub mod zobrist;

use board::Position;
use opening_book::OpeningBook;
use r#move::Move;
use search::{PvNode, SearchResult, Searcher};
use square::Square;
use tracing::debug;
use types::EngineOptions;

/// Engine facade: options, the searcher with its tables, and the opening
/// book, bundled with the lifetime of a playing session.
pub struct Engine {
    pub opts: EngineOptions,
    searcher: Searcher,
    book: OpeningBook,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::new_with(EngineOptions::default())
    }

    pub fn new_with(opts: EngineOptions) -> Self {
        let searcher = Searcher::with_max_nodes(opts.max_nodes);
        Engine {
            opts,
            searcher,
            book: OpeningBook::new(),
        }
    }

    /// Change the per-move node budget.
    pub fn set_max_nodes(&mut self, max_nodes: u64) {
        self.opts.max_nodes = max_nodes;
        self.searcher.set_max_nodes(max_nodes);
    }

    /// Load opening lines into the book; returns the number of lines
    /// accepted.
    pub fn load_book(&mut self, text: &str) -> usize {
        self.book.load(text)
    }

    pub fn book(&self) -> &OpeningBook {
        &self.book
    }

    /// Legal moves of a position, through the engine's move cache.
    pub fn legal_moves(&mut self, pos: &Position) -> Vec<Move> {
        self.searcher.legal_moves(pos)
    }

    /// Match an external step list against the legal moves and apply it.
    /// Returns the matched move and the successor position, or None when
    /// the steps describe no legal move.
    pub fn play(&mut self, pos: &Position, steps: &[Square]) -> Option<(Move, Position)> {
        let m = movegen::match_move(pos, steps)?;
        let next = pos.do_move(&m);
        Some((m, next))
    }

    /// The move to play: the opening book when it applies, otherwise an
    /// MTD-bi search within the node budget.
    pub fn best_move(&mut self, pos: &Position) -> SearchResult {
        if self.opts.use_book {
            if let Some(m) = self.book.probe(pos) {
                debug!(%m, "book move");
                return SearchResult {
                    best_move: Some(m.clone()),
                    score: pos.score(),
                    depth: 0,
                    nodes: 0,
                    pv: vec![m],
                };
            }
        }
        self.searcher.search(pos)
    }

    /// Forced-variation search (opponent restricted to captures).
    pub fn search_forced(&mut self, pos: &Position) -> SearchResult {
        self.searcher.search_forced(pos)
    }

    /// Aspiration-window alpha-beta search.
    pub fn search_window(&mut self, pos: &Position) -> SearchResult {
        self.searcher.search_window(pos)
    }

    /// Principal variation of the last [`Engine::best_move`] search.
    pub fn principal_variation(&self, pos: &Position) -> Vec<PvNode> {
        self.searcher.principal_variation(pos)
    }
}
