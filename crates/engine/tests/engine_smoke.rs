//! End-to-end scenarios exercising the whole engine surface: rules,
//! search, notation, and the opening book together.

use engine::board::Position;
use engine::io::parse_fen;
use engine::movegen::{gen_moves, has_capture, match_move};
use engine::piece::Side;
use engine::search::{Searcher, MATE_VALUE};
use engine::square::Square;
use engine::types::{EngineOptions, SearchReport};
use engine::Engine;

fn sq(n: u8) -> Square {
    Square::new(n)
}

#[test]
fn opening_moves_from_the_start_position() {
    let pos = Position::initial();
    let moves = gen_moves(&pos);
    assert_eq!(moves.len(), 9);
    for m in &moves {
        assert!(!m.is_capture());
        assert!(m.to().number() < m.from().number(), "men go forward");
    }
}

#[test]
fn a_full_miniature_game_stays_consistent() {
    // 1. 32-28 19-23 2. 28x19 14x23 — numbering is absolute, the
    // engine's frame rotates every ply.
    let mut engine = Engine::new();
    let mut pos = Position::initial();
    let mut side = Side::White;
    for notation in ["32-28", "19-23", "28x19", "14x23"] {
        let mut steps = engine::io::parse_steps(notation).unwrap();
        if side == Side::Black {
            for s in &mut steps {
                *s = s.mirror();
            }
        }
        let (m, next) = engine.play(&pos, &steps).unwrap_or_else(|| {
            panic!("move {} should be legal", notation);
        });
        assert_eq!(next.rotate().score(), pos.score() + pos.eval_move(&m));
        assert_eq!(next.score(), next.evaluate());
        pos = next;
        side = side.opponent();
    }
    // One man each was traded.
    let own = pos.cells().iter().filter(|c| c.is_own()).count();
    let theirs = pos.cells().iter().filter(|c| c.is_opponent()).count();
    assert_eq!(own, 19);
    assert_eq!(theirs, 19);
}

#[test]
fn search_solves_a_mandatory_chain() {
    // White's man must take the long chain; search and generator agree.
    let (_, pos) = parse_fen("W:W42:B17,28,38").unwrap();
    assert!(has_capture(&pos));
    let mut searcher = Searcher::with_max_nodes(2_000);
    let result = searcher.search(&pos);
    let best = result.best_move.expect("chain available");
    assert_eq!(best.takes().len(), 3);
    assert_eq!(best.to_string(), "42x11");
}

#[test]
fn lauwen_1977_problem_is_cracked() {
    // P. Lauwen, 1977. White to play and win.
    let (side, pos) = parse_fen("W:W15,19,24,29,32,41,49,50:B5,8,30,35,37,40,42,45").unwrap();
    assert_eq!(side, Side::White);
    let mut searcher = Searcher::with_max_nodes(200_000);
    let result = searcher.search(&pos);

    let best = result.best_move.clone().expect("white has moves");
    assert!(gen_moves(&pos).contains(&best));
    assert!(result.score.abs() > 0, "the problem position is decisive");

    // The winning line is long; the searcher must have looked well past
    // the immediate exchanges.
    assert!(result.depth >= 3);
    let report = SearchReport::from_result(&result, side);
    assert_eq!(report.best.as_deref(), Some(best.to_string().as_str()));
}

#[test]
fn terminal_position_returns_null_move() {
    let (_, pos) = parse_fen("W:W26:B17,K21").unwrap();
    assert!(gen_moves(&pos).is_empty());
    let mut searcher = Searcher::with_max_nodes(1_000);
    let result = searcher.search(&pos);
    assert!(result.best_move.is_none());
    assert!(result.score <= -MATE_VALUE);
    assert!(result.pv.is_empty());
}

#[test]
fn all_three_searchers_run_on_the_same_session() {
    let mut engine = Engine::new_with(EngineOptions {
        max_nodes: 3_000,
        use_book: false,
    });
    let pos = Position::initial();

    let mtd = engine.best_move(&pos);
    let forced = engine.search_forced(&pos);
    let window = engine.search_window(&pos);

    assert!(mtd.best_move.is_some());
    assert!(window.best_move.is_some());
    // Nothing forces from the quiet start position.
    assert_eq!(forced.score, pos.score());
}

#[test]
fn notation_round_trips_through_match_move() {
    let positions = [
        Position::initial(),
        parse_fen("W:W42,48:B17,28,38,43").unwrap().1,
        parse_fen("W:WK28:B19,41").unwrap().1,
    ];
    for pos in &positions {
        for m in gen_moves(pos) {
            // Rendered notation carries only the end squares; matching it
            // back must find a legal move with the same endpoints.
            let rendered = m.to_string();
            let steps = engine::io::parse_steps(&rendered).unwrap();
            let matched = match_move(pos, &steps).expect("rendered move matches");
            assert_eq!(matched.from(), m.from());
            assert_eq!(matched.to(), m.to());

            // The full step list pins the move down exactly.
            let exact = match_move(pos, m.steps()).expect("full path matches");
            assert_eq!(exact, m);
        }
    }
}

#[test]
fn book_guides_the_engine_then_search_takes_over() {
    let mut engine = Engine::new_with(EngineOptions {
        max_nodes: 1_000,
        use_book: true,
    });
    engine.load_book("1. 32-28 18-23 2. 38-32\n1. 32-28 19-23\n");

    let start = Position::initial();
    let first = engine.best_move(&start);
    assert_eq!(first.nodes, 0, "book answered");
    let (_, after) = engine
        .play(&start, &[sq(32), sq(28)])
        .expect("book move is legal");

    // Off-book position: the searcher answers now.
    let (_, wild) = engine
        .play(&after, &[sq(20).mirror(), sq(25).mirror()])
        .expect("20-25 is legal for black");
    let second = engine.best_move(&wild);
    assert!(second.nodes > 0, "no book hit here");
}
