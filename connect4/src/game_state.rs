use std::fmt::{self, Display, Formatter};

use engine::Outcome;

use super::action::{Action, NUM_COLUMNS, NUM_ROWS};

const TOP_ROW_MASK: u64 = 0b0100000_0100000_0100000_0100000_0100000_0100000_0100000;

/// Bitboard Connect Four position.
///
/// Each column occupies 7 bits starting from the bottom row. The 7th bit of every column is
/// always empty so that shifted boards never wrap from one column into the next.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub p1_turn_to_move: bool,
    pub p1_piece_board: u64,
    pub p2_piece_board: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    pub fn initial() -> Self {
        GameState {
            p1_turn_to_move: true,
            p1_piece_board: 0,
            p2_piece_board: 0,
        }
    }

    /// Plays the given columns in order from the initial position.
    pub fn from_columns(columns: &[usize]) -> Self {
        columns
            .iter()
            .fold(Self::initial(), |state, column| state.drop_piece(*column))
    }

    pub fn take_action(&self, action: &Action) -> Self {
        self.drop_piece(action.column())
    }

    pub fn drop_piece(&self, column: usize) -> Self {
        let column_adder = 1 << (7 * (column - 1));
        let all_pieces = self.p1_piece_board | self.p2_piece_board;
        let dropped_piece = (all_pieces + column_adder) & !all_pieces;
        let mut p1_piece_board = self.p1_piece_board;
        let mut p2_piece_board = self.p2_piece_board;

        if self.p1_turn_to_move {
            p1_piece_board |= dropped_piece;
        } else {
            p2_piece_board |= dropped_piece;
        }

        Self {
            p1_turn_to_move: !self.p1_turn_to_move,
            p1_piece_board,
            p2_piece_board,
        }
    }

    pub fn get_valid_actions(&self) -> Vec<bool> {
        let all_pieces = self.p1_piece_board | self.p2_piece_board;

        (1..=NUM_COLUMNS)
            .map(|column| {
                let column_mask_row_six = 1 << (7 * (column - 1) + 5);
                column_mask_row_six & all_pieces == 0
            })
            .collect()
    }

    pub fn valid_columns(&self) -> impl Iterator<Item = usize> {
        self.get_valid_actions()
            .into_iter()
            .enumerate()
            .filter(|(_, is_valid)| *is_valid)
            .map(|(idx, _)| idx + 1)
    }

    /// The column that was played to reach `next` from this position, if it is a direct successor.
    pub fn column_played(&self, next: &GameState) -> Option<usize> {
        self.valid_columns()
            .find(|column| self.drop_piece(*column) == *next)
    }

    /// Determines if the current state is either a won or drawn position.
    ///
    /// Only the player that just moved can have connected four, so a win is always attributed to
    /// the player who is not to move.
    pub fn outcome(&self) -> Option<Outcome> {
        let all_pieces = self.p1_piece_board | self.p2_piece_board;

        if self.has_connected_4() {
            return Some(if self.p1_turn_to_move {
                Outcome::PlayerTwoWin
            } else {
                Outcome::PlayerOneWin
            });
        }

        if all_pieces & TOP_ROW_MASK == TOP_ROW_MASK {
            return Some(Outcome::Draw);
        }

        None
    }

    pub fn number_of_actions(&self) -> usize {
        (self.p1_piece_board | self.p2_piece_board).count_ones() as usize
    }

    fn has_connected_4(&self) -> bool {
        let board = if self.p1_turn_to_move {
            self.p2_piece_board
        } else {
            self.p1_piece_board
        };

        // Diagonal, horizontal, other diagonal and vertical.
        [6, 7, 8, 1].iter().any(|shift| {
            let c2 = board & (board << shift);
            c2 & (c2 << (2 * shift)) != 0
        })
    }

    fn piece_at(&self, column: usize, row: usize) -> &'static str {
        let bit = 1 << (column * 7 + row);

        if self.p1_piece_board & bit != 0 {
            "X"
        } else if self.p2_piece_board & bit != 0 {
            "O"
        } else {
            " "
        }
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "   +---+---+---+---+---+---+---+")?;

        for row in (0..NUM_ROWS).rev() {
            write!(f, "   |")?;
            for column in 0..NUM_COLUMNS {
                write!(f, " {} |", self.piece_at(column, row))?;
            }
            writeln!(f)?;
            if row != 0 {
                writeln!(f, "   |---+---+---+---+---+---+---|")?;
            }
        }

        writeln!(f, "   +---+---+---+---+---+---+---+")?;
        writeln!(f, "     1   2   3   4   5   6   7  ")?;

        Ok(())
    }
}
