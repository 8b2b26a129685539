use crate::piece::Side;
use crate::search::{SearchResult, DEFAULT_MAX_NODES};
use serde::{Deserialize, Serialize};

/// Engine configuration, supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    /// Search budget per move, in nodes.
    pub max_nodes: u64,
    /// Consult the opening book before searching.
    pub use_book: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            max_nodes: DEFAULT_MAX_NODES,
            use_book: true,
        }
    }
}

/// Serializable summary of a search, with moves rendered in the fixed
/// board numbering (the caller supplies the actual side to move so the
/// rotating frames can be translated back).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub depth: i32,
    pub score: i32,
    pub nodes: u64,
    pub best: Option<String>,
    pub pv: Vec<String>,
}

impl SearchReport {
    pub fn from_result(result: &SearchResult, side: Side) -> Self {
        let absolute = |mv: &crate::r#move::Move, mover: Side| match mover {
            Side::White => mv.to_string(),
            Side::Black => mv.mirrored().to_string(),
        };
        let mut mover = side;
        let mut pv = Vec::with_capacity(result.pv.len());
        for mv in &result.pv {
            pv.push(absolute(mv, mover));
            mover = mover.opponent();
        }
        SearchReport {
            depth: result.depth,
            score: result.score,
            nodes: result.nodes,
            best: result.best_move.as_ref().map(|m| absolute(m, side)),
            pv,
        }
    }
}
