/// Board and move notation parsing and rendering.
///
/// Two position formats are accepted:
///
/// 1. A board literal: 50 cells over `{p,P,k,K,.}` in square order 1-50,
///    whitespace ignored, uppercase to move.
/// 2. A FEN-like string `C:C1,C2,...:C1,C2,...` with `C` in `{W,B}`,
///    where each item is a square number, a range `a-b`, or a `K`-prefixed
///    king square; an optional `.suffix` is ignored.
///
/// The engine's `Position` always has the side to move as uppercase, so
/// parsing a FEN with Black to move rotates the board; the actual color is
/// returned alongside so callers can translate back.
use crate::board::Position;
use crate::piece::{Cell, Side};
use crate::square::{Square, BOARD_SIZE};
use thiserror::Error;

/// FEN of the initial draughts-100 position.
pub const INITIAL_FEN: &str = "W:W31-50:B1-20";

/// Error type for notation parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid board literal: {0}")]
    InvalidBoard(String),
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
    #[error("invalid square number: {0}")]
    InvalidSquare(String),
    #[error("invalid move notation: {0}")]
    InvalidMove(String),
}

/// Parse a 50-cell board literal, uppercase to move.
///
/// # Example
/// ```
/// use engine::io::parse_board;
///
/// let pos = parse_board(
///     "ppppp ppppp ppppp ppppp \
///      ..... ..... \
///      PPPPP PPPPP PPPPP PPPPP",
/// )
/// .unwrap();
/// assert_eq!(pos.score(), 0);
/// ```
pub fn parse_board(text: &str) -> Result<Position, ParseError> {
    let mut cells = [Cell::Empty; BOARD_SIZE];
    let mut index = 1;
    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        let cell = Cell::from_char(c)
            .filter(|cell| *cell != Cell::Off)
            .ok_or_else(|| ParseError::InvalidBoard(format!("bad cell '{}'", c)))?;
        if index > 50 {
            return Err(ParseError::InvalidBoard("more than 50 cells".into()));
        }
        cells[index] = cell;
        index += 1;
    }
    if index != 51 {
        return Err(ParseError::InvalidBoard(format!(
            "expected 50 cells, got {}",
            index - 1
        )));
    }
    Ok(Position::from_cells(cells))
}

/// Parse a FEN-like position string.
///
/// Returns the side to move and the position, canonicalized so that the
/// side to move is uppercase (the board is rotated when Black moves).
///
/// # Example
/// ```
/// use engine::io::{parse_fen, INITIAL_FEN};
/// use engine::board::Position;
/// use engine::piece::Side;
///
/// let (side, pos) = parse_fen(INITIAL_FEN).unwrap();
/// assert_eq!(side, Side::White);
/// assert_eq!(pos, Position::initial());
/// ```
pub fn parse_fen(fen: &str) -> Result<(Side, Position), ParseError> {
    let body = match fen.find('.') {
        Some(i) => &fen[..i],
        None => fen,
    };
    let body = body.trim();

    let parts: Vec<&str> = body.split(':').collect();
    if parts.len() != 3 {
        return Err(ParseError::InvalidFen(format!(
            "expected 3 colon-separated fields, got {}",
            parts.len()
        )));
    }

    let side = parse_side(parts[0])?;
    let mut cells = [Cell::Empty; BOARD_SIZE];
    for group in &parts[1..] {
        parse_group(group, &mut cells)?;
    }

    let pos = Position::from_cells(cells);
    // The cell array was built with White uppercase; rotate into the
    // side-to-move frame when Black moves.
    let pos = match side {
        Side::White => pos,
        Side::Black => pos.rotate(),
    };
    Ok((side, pos))
}

fn parse_side(field: &str) -> Result<Side, ParseError> {
    let mut chars = field.trim().chars();
    match (chars.next().and_then(Side::from_char), chars.next()) {
        (Some(side), None) => Ok(side),
        _ => Err(ParseError::InvalidFen(format!("bad side field '{}'", field))),
    }
}

/// Parse one `W...`/`B...` piece group into the White-frame cell array.
fn parse_group(group: &str, cells: &mut [Cell; BOARD_SIZE]) -> Result<(), ParseError> {
    let group = group.trim();
    let Some(color) = group.chars().next().and_then(Side::from_char) else {
        return Err(ParseError::InvalidFen(format!("bad piece group '{}'", group)));
    };
    let items = &group[1..];
    if items.is_empty() {
        return Ok(());
    }
    for item in items.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let (king, body) = match item.strip_prefix(['K', 'k']) {
            Some(rest) => (true, rest),
            None => (false, item),
        };
        let (first, last) = match body.split_once('-') {
            Some((a, b)) => (parse_square(a)?, parse_square(b)?),
            None => {
                let sq = parse_square(body)?;
                (sq, sq)
            }
        };
        if first.number() > last.number() {
            return Err(ParseError::InvalidFen(format!("bad range '{}'", item)));
        }
        for n in first.number()..=last.number() {
            let cell = match (color, king) {
                (Side::White, false) => Cell::Man,
                (Side::White, true) => Cell::King,
                (Side::Black, false) => Cell::OppMan,
                (Side::Black, true) => Cell::OppKing,
            };
            cells[n as usize] = cell;
        }
    }
    Ok(())
}

fn parse_square(text: &str) -> Result<Square, ParseError> {
    text.trim()
        .parse::<u8>()
        .ok()
        .and_then(Square::try_new)
        .ok_or_else(|| ParseError::InvalidSquare(text.to_string()))
}

/// Render a position as a FEN string, given the actual side to move.
pub fn to_fen(pos: &Position, side: Side) -> String {
    // Bring the board into the White frame: uppercase cells are White's.
    let white_frame = match side {
        Side::White => pos.clone(),
        Side::Black => pos.rotate(),
    };
    let mut white = Vec::new();
    let mut black = Vec::new();
    for sq in Square::all() {
        match white_frame.cell(sq) {
            Cell::Man => white.push((sq.number(), false)),
            Cell::King => white.push((sq.number(), true)),
            Cell::OppMan => black.push((sq.number(), false)),
            Cell::OppKing => black.push((sq.number(), true)),
            _ => {}
        }
    }
    let render = |pieces: &[(u8, bool)]| -> String {
        pieces
            .iter()
            .map(|&(n, king)| {
                if king {
                    format!("K{}", n)
                } else {
                    n.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "{}:W{}:B{}",
        side.to_char(),
        render(&white),
        render(&black)
    )
}

/// Parse numeric move notation (`32-28`, `26x37`, `26x37x28`) into the
/// list of visited squares, in the fixed board numbering.
pub fn parse_steps(text: &str) -> Result<Vec<Square>, ParseError> {
    let text = text.trim();
    let steps: Result<Vec<Square>, ParseError> = text
        .split(['-', 'x', 'X'])
        .map(parse_square)
        .collect();
    let steps = steps.map_err(|_| ParseError::InvalidMove(text.to_string()))?;
    if steps.len() < 2 {
        return Err(ParseError::InvalidMove(text.to_string()));
    }
    Ok(steps)
}

/// ASCII diagram of the board from White's point of view.
///
/// White pieces render as `w`/`W` (man/king), Black as `b`/`B`.
pub fn diagram(pos: &Position, side: Side) -> String {
    let white_frame = match side {
        Side::White => pos.clone(),
        Side::Black => pos.rotate(),
    };
    let mut out = String::new();
    for row in 0..10u8 {
        for col in 0..10u8 {
            let glyph = match Square::from_grid(row as i8, col as i8) {
                Some(sq) => match white_frame.cell(sq) {
                    Cell::Man => 'w',
                    Cell::King => 'W',
                    Cell::OppMan => 'b',
                    Cell::OppKing => 'B',
                    _ => '.',
                },
                None => ' ',
            };
            out.push(' ');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
