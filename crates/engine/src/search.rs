//! Search: MTD-bi, forced-variation, and aspiration alpha-beta.
//!
//! All three searchers share the same skeleton: iterative deepening driven
//! by a node budget, a private transposition table, quiescence through the
//! maximum-capture rule (a position with captures pending is never treated
//! as a leaf), and principal-variation recovery by walking the table.
//!
//! Scores are integers from the side to move's point of view (except in
//! the explicit max/min alpha-beta, which keeps the root player's frame).
//! A side with no legal moves has lost.

use crate::board::Position;
use crate::movegen::{gen_moves, has_capture, MoveCache};
use crate::r#move::Move;
use crate::tt::{ForcedEntry, MtdEntry, TableEntry, TransTable, WindowEntry, TABLE_SIZE};
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::debug;

/// Scores at or beyond this magnitude mean the game is decided.
pub const MATE_VALUE: i32 = 90_000;

/// Larger than any reachable score; window bound and lost-position score.
pub const INFINITY: i32 = 100_000;

/// Iterative deepening never goes past this depth.
pub const MAX_DEPTH: i32 = 99;

/// Default search budget in nodes.
pub const DEFAULT_MAX_NODES: u64 = 1_000;

/// Half-width of the aspiration window.
const ASPIRATION_WINDOW: i32 = 50;

/// Search result: the move to play plus how it was found.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move, or None for a terminal position.
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest completed iteration.
    pub depth: i32,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

/// One step of a principal variation: the position before the move, the
/// stored score, and the move played.
#[derive(Debug, Clone)]
pub struct PvNode {
    pub position: Position,
    pub score: i32,
    pub mv: Move,
}

/// The search engine. Owns the three transposition tables, the legal-move
/// cache, and the node budget; lives for a whole playing session.
pub struct Searcher {
    table: TransTable<MtdEntry>,
    forced_table: TransTable<ForcedEntry>,
    window_table: TransTable<WindowEntry>,
    cache: MoveCache,
    nodes: u64,
    max_nodes: u64,
}

impl Searcher {
    /// Create a searcher with the default node budget.
    pub fn new() -> Self {
        Self::with_max_nodes(DEFAULT_MAX_NODES)
    }

    /// Create a searcher with a custom node budget.
    pub fn with_max_nodes(max_nodes: u64) -> Self {
        Searcher {
            table: TransTable::new(TABLE_SIZE),
            forced_table: TransTable::new(TABLE_SIZE),
            window_table: TransTable::new(TABLE_SIZE),
            cache: MoveCache::new(),
            nodes: 0,
            max_nodes,
        }
    }

    /// Change the node budget for subsequent searches.
    pub fn set_max_nodes(&mut self, max_nodes: u64) {
        self.max_nodes = max_nodes;
    }

    /// Nodes visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Legal moves of `pos`, through the memoizing cache.
    pub fn legal_moves(&mut self, pos: &Position) -> Vec<Move> {
        self.cache.legal_moves(pos)
    }

    // ------------------------------------------------------------------
    // MTD-bi
    // ------------------------------------------------------------------

    /// MTD-bi: iterative deepening where every depth is solved by
    /// bisecting the score interval with null-window [`Searcher::bound`]
    /// probes. The workhorse searcher.
    pub fn search(&mut self, pos: &Position) -> SearchResult {
        self.nodes = 0;
        self.table.begin_search();

        let mut score = pos.score();
        let mut completed = 0;
        for depth in 1..=MAX_DEPTH {
            let mut lower = -INFINITY;
            let mut upper = INFINITY;
            while lower < upper - 3 {
                let gamma = (lower + upper + 1).div_euclid(2);
                score = self.bound(pos, gamma, depth);
                if score >= gamma {
                    lower = score;
                } else {
                    upper = score;
                }
            }
            completed = depth;
            debug!(depth, score, nodes = self.nodes, "mtd-bi iteration");
            if self.nodes >= self.max_nodes || score.abs() >= MATE_VALUE {
                break;
            }
        }

        let best_move = self.table.get(pos.hash()).and_then(|e| e.best.clone());
        let pv = pv_moves(&self.table, pos);
        SearchResult {
            best_move,
            score,
            depth: completed,
            nodes: self.nodes,
            pv,
        }
    }

    /// Null-window probe: is the true score of `pos` at `depth` at least
    /// `gamma`? Returns a best score that is trustworthy only on the side
    /// of `gamma` it falls on.
    fn bound(&mut self, pos: &Position, gamma: i32, depth: i32) -> i32 {
        self.nodes += 1;
        let key = pos.hash();

        if let Some(entry) = self.table.get(key) {
            let usable = (entry.score < entry.gamma && entry.score < gamma)
                || (entry.score >= entry.gamma && entry.score >= gamma);
            if entry.depth >= depth && usable {
                return entry.score;
            }
        }

        if pos.score().abs() >= MATE_VALUE {
            return pos.score();
        }

        let capture = has_capture(pos);

        // Null move: hand the opponent the turn at reduced depth. Unsafe
        // when a capture is pending, so it is guarded out then.
        if depth >= 4 && !capture {
            let reduction = if depth > 8 { 3 } else { 2 };
            let nullscore = -self.bound(&pos.rotate(), 1 - gamma, depth - 1 - reduction);
            if nullscore >= gamma {
                return nullscore;
            }
        }

        // Quiescence: a capture-free position at the horizon stands pat;
        // with captures pending the move loop below only contains
        // captures (maximum-capture rule) and the search extends.
        if depth <= 0 && !capture {
            return pos.score();
        }

        let mut moves = self.cache.legal_moves(pos);
        moves.sort_by_key(|m| Reverse(pos.eval_move(m)));

        let mut best = -INFINITY;
        let mut best_move = None;
        for m in moves {
            let score = -self.bound(&pos.do_move(&m), 1 - gamma, depth - 1);
            if score > best {
                best = score;
                best_move = Some(m);
            }
            if best >= gamma {
                break;
            }
        }

        // Fail-high entries are preferred: they carry the move that
        // anchors the principal variation.
        let replace = match self.table.get(key) {
            Some(old) => depth >= old.depth && best >= gamma,
            None => true,
        };
        if replace {
            self.table.insert(
                key,
                MtdEntry {
                    depth,
                    score: best,
                    gamma,
                    best: best_move,
                },
            );
        }
        best
    }

    // ------------------------------------------------------------------
    // Forced-variation search
    // ------------------------------------------------------------------

    /// Search only forcing lines: the side to move may play anything that
    /// leaves the opponent a capture (or is itself a capture), the
    /// opponent answers with captures only. Useful for spotting shots and
    /// combinations well beyond the full-width horizon.
    pub fn search_forced(&mut self, pos: &Position) -> SearchResult {
        self.nodes = 0;
        self.forced_table.begin_search();

        let mut score = pos.score();
        let mut completed = 0;
        for depth in 1..=MAX_DEPTH {
            score = self.forced(pos, depth, 0);
            completed = depth;
            debug!(depth, score, nodes = self.nodes, "forced iteration");
            if self.nodes >= self.max_nodes {
                break;
            }
        }

        let best_move = self
            .forced_table
            .get(pos.hash())
            .and_then(|e| e.best.clone());
        let pv = pv_moves(&self.forced_table, pos);
        SearchResult {
            best_move,
            score,
            depth: completed,
            nodes: self.nodes,
            pv,
        }
    }

    /// Negamax restricted to forcing lines. `player` alternates 0/1; 0 is
    /// the side whose forced win is being probed.
    fn forced(&mut self, pos: &Position, depth: i32, player: u8) -> i32 {
        self.nodes += 1;
        let key = pos.hash();

        if let Some(entry) = self.forced_table.get(key) {
            if entry.depth >= depth {
                return entry.score;
            }
        }

        if pos.score().abs() >= MATE_VALUE {
            return pos.score();
        }

        if depth <= 0 && !has_capture(pos) {
            return pos.score();
        }

        let moves = self.cache.legal_moves(pos);
        let mut best: Option<i32> = None;
        let mut best_move = None;
        for m in moves {
            let next = pos.do_move(&m);
            if !m.is_capture() {
                // Quiet moves survive the filter only for the probing side
                // and only when they leave the opponent a capture.
                let forcing = player == 0 && has_capture(&next);
                if !forcing {
                    continue;
                }
            }
            let score = -self.forced(&next, depth - 1, 1 - player);
            if best.map_or(true, |b| score > b) {
                best = Some(score);
                best_move = Some(m);
            }
        }

        // Every move filtered out: the forced line has run dry.
        let Some(best) = best else {
            return pos.score();
        };

        let replace = match self.forced_table.get(key) {
            Some(old) => depth >= old.depth,
            None => true,
        };
        if replace {
            self.forced_table.insert(
                key,
                ForcedEntry {
                    depth,
                    score: best,
                    best: best_move,
                },
            );
        }
        best
    }

    // ------------------------------------------------------------------
    // Alpha-beta with aspiration windows
    // ------------------------------------------------------------------

    /// Classical failsoft alpha-beta, searching each depth inside a
    /// narrow window around the previous score and re-searching with the
    /// full window when the score falls outside it.
    pub fn search_window(&mut self, pos: &Position) -> SearchResult {
        self.nodes = 0;
        self.window_table.begin_search();

        let mut alpha = -INFINITY;
        let mut beta = INFINITY;
        let mut score = pos.score();
        let mut completed = 0;
        let mut depth = 1;
        while depth <= MAX_DEPTH {
            let probed = self.alphabeta(pos, alpha, beta, depth, 0);
            let failed_low = probed <= alpha && alpha > -INFINITY;
            let failed_high = probed >= beta && beta < INFINITY;
            if failed_low || failed_high {
                // Aspiration failed: redo this depth with the full window.
                alpha = -INFINITY;
                beta = INFINITY;
                debug!(depth, probed, "aspiration re-search");
                continue;
            }
            score = probed;
            completed = depth;
            alpha = score - ASPIRATION_WINDOW;
            beta = score + ASPIRATION_WINDOW;
            debug!(depth, score, nodes = self.nodes, "alpha-beta iteration");
            if self.nodes >= self.max_nodes || score.abs() >= MATE_VALUE {
                break;
            }
            depth += 1;
        }

        let best_move = self
            .window_table
            .get(pos.hash())
            .and_then(|e| e.best.clone());
        let pv = pv_moves(&self.window_table, pos);
        SearchResult {
            best_move,
            score,
            depth: completed,
            nodes: self.nodes,
            pv,
        }
    }

    /// Failsoft alpha-beta with an explicit max player (0) and min player
    /// (1); scores stay in the max player's frame throughout.
    fn alphabeta(&mut self, pos: &Position, mut alpha: i32, mut beta: i32, depth: i32, player: u8) -> i32 {
        self.nodes += 1;
        let key = pos.hash();

        if let Some(entry) = self.window_table.get(key) {
            if entry.depth >= depth {
                return entry.score;
            }
        }

        let stand = if player == 0 { pos.score() } else { -pos.score() };
        if stand.abs() >= MATE_VALUE {
            return stand;
        }

        let capture = has_capture(pos);

        if depth >= 4 && !capture {
            let reduction = if depth > 8 { 3 } else { 2 };
            let nullscore =
                self.alphabeta(&pos.rotate(), alpha, beta, depth - 1 - reduction, 1 - player);
            if player == 0 && nullscore >= beta {
                return nullscore;
            }
            if player == 1 && nullscore <= alpha {
                return nullscore;
            }
        }

        if depth <= 0 && !capture {
            return stand;
        }

        let mut moves = self.cache.legal_moves(pos);
        moves.sort_by_key(|m| Reverse(pos.eval_move(m)));

        let mut best_move = None;
        let best = if player == 0 {
            let mut best = -INFINITY;
            for m in moves {
                let score = self.alphabeta(&pos.do_move(&m), alpha, beta, depth - 1, 1);
                if score > best {
                    best = score;
                    best_move = Some(m);
                }
                alpha = alpha.max(best);
                if best >= beta {
                    break;
                }
            }
            best
        } else {
            let mut best = INFINITY;
            for m in moves {
                let score = self.alphabeta(&pos.do_move(&m), alpha, beta, depth - 1, 0);
                if score < best {
                    best = score;
                    best_move = Some(m);
                }
                beta = beta.min(best);
                if best <= alpha {
                    break;
                }
            }
            best
        };

        let replace = match self.window_table.get(key) {
            Some(old) => depth >= old.depth,
            None => true,
        };
        if replace {
            self.window_table.insert(
                key,
                WindowEntry {
                    depth,
                    score: best,
                    best: best_move,
                },
            );
        }
        best
    }

    // ------------------------------------------------------------------
    // Principal variation
    // ------------------------------------------------------------------

    /// Reconstruct the principal variation of the last [`Searcher::search`]
    /// by following best moves through the transposition table.
    pub fn principal_variation(&self, pos: &Position) -> Vec<PvNode> {
        pv_walk(&self.table, pos)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk a transposition table from `pos`, following stored best moves.
///
/// Stops on a missing entry, a missing best move, an illegal stored move
/// (key collision), or a repeated position (loop guard).
fn pv_walk<E: TableEntry>(table: &TransTable<E>, pos: &Position) -> Vec<PvNode> {
    let mut line = Vec::new();
    let mut current = pos.clone();
    let mut seen = HashSet::new();
    loop {
        let key = current.hash();
        if !seen.insert(key) {
            break;
        }
        let Some(entry) = table.get(key) else {
            break;
        };
        let Some(mv) = entry.best_move() else {
            break;
        };
        if !gen_moves(&current).iter().any(|m| m == mv) {
            break;
        }
        let next = current.do_move(mv);
        line.push(PvNode {
            position: current,
            score: entry.score(),
            mv: mv.clone(),
        });
        current = next;
    }
    line
}

/// Just the moves of the principal variation.
fn pv_moves<E: TableEntry>(table: &TransTable<E>, pos: &Position) -> Vec<Move> {
    pv_walk(table, pos).into_iter().map(|node| node.mv).collect()
}
