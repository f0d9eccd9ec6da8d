use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    PlayerOneWin,
    Draw,
    PlayerTwoWin,
}

impl Outcome {
    /// The outcome from the reference of player one, who is always the maximizing player.
    pub fn value(&self) -> f32 {
        match self {
            Outcome::PlayerOneWin => 1.0,
            Outcome::Draw => 0.0,
            Outcome::PlayerTwoWin => -1.0,
        }
    }

    pub fn from_value(value: f32) -> Option<Self> {
        if value == 1.0 {
            Some(Outcome::PlayerOneWin)
        } else if value == 0.0 {
            Some(Outcome::Draw)
        } else if value == -1.0 {
            Some(Outcome::PlayerTwoWin)
        } else {
            None
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PlayerOneWin => write!(f, "Player 1 wins"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::PlayerTwoWin => write!(f, "Player 2 wins"),
        }
    }
}
