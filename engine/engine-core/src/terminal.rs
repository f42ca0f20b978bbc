//! Terminal status of a position.

/// Whether a position is finished, and how, for the side to move.
///
/// In chess a checkmated side to move is a [`Terminal::Loss`]; a stalemate or
/// any other drawn state is [`Terminal::Draw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// The game continues
    Ongoing,
    /// The side to move has won
    Win,
    /// The side to move has lost
    Loss,
    /// The game is drawn
    Draw,
}

impl Terminal {
    /// True for every variant except [`Terminal::Ongoing`].
    #[inline]
    pub fn is_terminal(self) -> bool {
        self != Terminal::Ongoing
    }

    /// Outcome value for the side to move: +1 win, -1 loss, 0 draw.
    /// Returns `None` while the game is ongoing.
    #[inline]
    pub fn value(self) -> Option<f32> {
        match self {
            Terminal::Ongoing => None,
            Terminal::Win => Some(1.0),
            Terminal::Loss => Some(-1.0),
            Terminal::Draw => Some(0.0),
        }
    }

    /// The same outcome seen by the other player.
    pub fn flipped(self) -> Self {
        match self {
            Terminal::Win => Terminal::Loss,
            Terminal::Loss => Terminal::Win,
            other => other,
        }
    }
}
