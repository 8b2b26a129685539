//! Interactive shell around the draughts engine.
//!
//! Reads commands from stdin, one per line; moves are entered and printed
//! in the fixed board numbering regardless of whose turn it is.

use anyhow::{bail, Context, Result};
use engine::board::Position;
use engine::io;
use engine::piece::Side;
use engine::r#move::Move;
use engine::search::SearchResult;
use engine::types::SearchReport;
use engine::Engine;
use std::io::{BufRead, Write};
use tracing::{info, warn};

const HELP: &str = "\
commands:
  new                 start a fresh game
  fen <FEN>           set the position from a FEN string
  board <literal>     set the position from a 50-cell board literal
  show                print the board, FEN and static score
  moves               list the legal moves
  move <notation>     play a move, e.g. 32-28 or 26x37
  go                  search, play and print the best move
  forced              run the forced-variation search
  window              run the aspiration alpha-beta search
  pv                  print the principal variation of the last search
  nodes <n>           set the search budget in nodes
  book <path>         load an opening book file
  report              print the last search report as JSON
  help                this text
  quit                leave";

struct Session {
    engine: Engine,
    pos: Position,
    side: Side,
    last: Option<SearchReport>,
}

impl Session {
    fn new() -> Self {
        Session {
            engine: Engine::new(),
            pos: Position::initial(),
            side: Side::White,
            last: None,
        }
    }

    /// Render a frame move in the fixed board numbering.
    fn absolute(&self, m: &Move) -> String {
        match self.side {
            Side::White => m.to_string(),
            Side::Black => m.mirrored().to_string(),
        }
    }

    fn show(&self) {
        print!("{}", io::diagram(&self.pos, self.side));
        println!("{}  score {}", io::to_fen(&self.pos, self.side), self.pos.score());
    }

    fn list_moves(&mut self) {
        let moves = self.engine.legal_moves(&self.pos);
        if moves.is_empty() {
            println!("no legal moves - {} has lost", self.side);
            return;
        }
        let rendered: Vec<String> = moves.iter().map(|m| self.absolute(m)).collect();
        println!("{}", rendered.join(" "));
    }

    fn play_steps(&mut self, notation: &str) -> Result<()> {
        let mut steps = io::parse_steps(notation)?;
        if self.side == Side::Black {
            for s in &mut steps {
                *s = s.mirror();
            }
        }
        let Some((m, next)) = self.engine.play(&self.pos, &steps) else {
            bail!("{} is not a legal move here", notation);
        };
        info!(mv = %self.absolute(&m), side = %self.side, "played");
        self.pos = next;
        self.side = self.side.opponent();
        Ok(())
    }

    fn record(&mut self, result: &SearchResult) {
        self.last = Some(SearchReport::from_result(result, self.side));
    }

    fn go(&mut self) {
        let result = self.engine.best_move(&self.pos);
        self.record(&result);
        match result.best_move {
            Some(ref m) => {
                println!(
                    "best {}  score {}  depth {}  nodes {}",
                    self.absolute(m),
                    result.score,
                    result.depth,
                    result.nodes
                );
                self.pos = self.pos.do_move(m);
                self.side = self.side.opponent();
            }
            None => println!("no move - {} has lost", self.side),
        }
    }

    fn probe(&mut self, forced: bool) {
        let result = if forced {
            self.engine.search_forced(&self.pos)
        } else {
            self.engine.search_window(&self.pos)
        };
        self.record(&result);
        let best = result
            .best_move
            .as_ref()
            .map(|m| self.absolute(m))
            .unwrap_or_else(|| "-".into());
        println!(
            "best {}  score {}  depth {}  nodes {}",
            best, result.score, result.depth, result.nodes
        );
    }

    fn print_pv(&self) {
        let line = self.engine.principal_variation(&self.pos);
        if line.is_empty() {
            println!("no stored line for this position");
            return;
        }
        let mut side = self.side;
        let mut rendered = Vec::with_capacity(line.len());
        for node in &line {
            let m = match side {
                Side::White => node.mv.to_string(),
                Side::Black => node.mv.mirrored().to_string(),
            };
            rendered.push(format!("{} ({})", m, node.score));
            side = side.opponent();
        }
        println!("{}", rendered.join(" "));
    }

    fn command(&mut self, line: &str) -> Result<bool> {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let Some(cmd) = parts.next().filter(|c| !c.is_empty()) else {
            return Ok(true);
        };
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "new" => {
                self.pos = Position::initial();
                self.side = Side::White;
                self.last = None;
            }
            "fen" => {
                let (side, pos) = io::parse_fen(rest)?;
                self.pos = pos;
                self.side = side;
            }
            "board" => {
                self.pos = io::parse_board(rest)?;
                self.side = Side::White;
            }
            "show" => self.show(),
            "moves" => self.list_moves(),
            "move" | "m" => self.play_steps(rest)?,
            "go" => self.go(),
            "forced" => self.probe(true),
            "window" => self.probe(false),
            "pv" => self.print_pv(),
            "nodes" => {
                let n: u64 = rest.parse().context("nodes expects a number")?;
                self.engine.set_max_nodes(n);
            }
            "book" => {
                let text = std::fs::read_to_string(rest)
                    .with_context(|| format!("cannot read book file {}", rest))?;
                let lines = self.engine.load_book(&text);
                println!(
                    "loaded {} lines, {} positions",
                    lines,
                    self.engine.book().size()
                );
            }
            "report" => match &self.last {
                Some(report) => println!("{}", serde_json::to_string_pretty(report)?),
                None => println!("nothing searched yet"),
            },
            "help" => println!("{}", HELP),
            "quit" | "exit" => return Ok(false),
            other => bail!("unknown command '{}' (try help)", other),
        }
        Ok(true)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    info!("draughts shell ready, type 'help' for commands");
    let mut session = Session::new();
    let stdin = std::io::stdin();
    let mut out = std::io::stdout();

    loop {
        print!("> ");
        out.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match session.command(&line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => warn!(%err, "command failed"),
        }
    }
    Ok(())
}
