use crate::square::Square;

/// A draughts move.
///
/// `steps` records the origin followed by the landing square of every leg;
/// a non-capture has exactly two steps. `takes` lists the squares of the
/// captured pieces, one per leg, duplicate-free by construction.
///
/// # Example
/// ```
/// use engine::r#move::Move;
/// use engine::square::Square;
///
/// let m = Move::step(Square::new(32), Square::new(28));
/// assert_eq!(m.from(), Square::new(32));
/// assert_eq!(m.to(), Square::new(28));
/// assert!(!m.is_capture());
/// assert_eq!(m.to_string(), "32-28");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    steps: Vec<Square>,
    takes: Vec<Square>,
}

impl Move {
    /// Creates a plain (non-capturing) move.
    #[inline]
    pub fn step(from: Square, to: Square) -> Self {
        Move {
            steps: vec![from, to],
            takes: Vec::new(),
        }
    }

    /// Creates a capture from the visited squares and the captured squares.
    ///
    /// `steps` must hold the origin plus one landing square per leg, so
    /// `steps.len() == takes.len() + 1`.
    #[inline]
    pub fn capture(steps: Vec<Square>, takes: Vec<Square>) -> Self {
        debug_assert!(steps.len() >= 2);
        debug_assert_eq!(steps.len(), takes.len() + 1);
        Move { steps, takes }
    }

    /// Returns the origin square.
    #[inline]
    pub fn from(&self) -> Square {
        self.steps[0]
    }

    /// Returns the final landing square.
    #[inline]
    pub fn to(&self) -> Square {
        self.steps[self.steps.len() - 1]
    }

    /// Returns all visited squares, origin first.
    #[inline]
    pub fn steps(&self) -> &[Square] {
        &self.steps
    }

    /// Returns the captured squares.
    #[inline]
    pub fn takes(&self) -> &[Square] {
        &self.takes
    }

    /// Returns true if this move captures at least one piece.
    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.takes.is_empty()
    }

    /// The same move seen from the rotated board, every square mirrored.
    ///
    /// Game notation is written in the fixed board numbering while the
    /// engine's frame rotates every ply; this converts between the two.
    pub fn mirrored(&self) -> Move {
        Move {
            steps: self.steps.iter().map(|s| s.mirror()).collect(),
            takes: self.takes.iter().map(|s| s.mirror()).collect(),
        }
    }

    /// Returns the numeric notation, e.g. "32-28" or "26x37".
    ///
    /// Only the end squares are rendered; intermediate landing squares are
    /// implied, which matches standard draughts game notation.
    pub fn notation(&self) -> String {
        let sep = if self.is_capture() { 'x' } else { '-' };
        format!("{}{}{}", self.from(), sep, self.to())
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation())
    }
}
