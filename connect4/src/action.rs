use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use anyhow::anyhow;

pub const NUM_COLUMNS: usize = 7;
pub const NUM_ROWS: usize = 6;

/// A piece dropped into one of the columns, numbered 1 through 7 from the left.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Action {
    DropPiece(usize),
}

impl Action {
    pub fn column(&self) -> usize {
        let Action::DropPiece(column) = self;
        *column
    }

    /// Parses a whitespace or comma separated list of columns such as `"4 4 3"`.
    pub fn parse_sequence(sequence: &str) -> anyhow::Result<Vec<Action>> {
        sequence
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column: usize = s.trim().parse()?;

        if !(1..=NUM_COLUMNS).contains(&column) {
            return Err(anyhow!("Column number must be between 1 and {}", NUM_COLUMNS));
        }

        Ok(Action::DropPiece(column))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
