//! Player colors and pawn identification.
//!
//! The engine itself only deals in register indices. Colors matter in two
//! places: the measurement basis table keys on the color that forced a
//! measurement, and the history stack stores the caller's occupancy next to
//! each program snapshot.

use serde::{Deserialize, Serialize};

/// Number of players.
pub const COLOR_COUNT: usize = 4;

/// Pawns per player.
pub const PAWNS_PER_COLOR: u8 = 2;

/// Player color, in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Blue,
    Purple,
}

impl Color {
    /// All colors in turn order.
    pub const ALL: [Color; COLOR_COUNT] = [Color::Red, Color::Green, Color::Blue, Color::Purple];

    /// 0-based turn-order index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color for a turn-order index (wraps around).
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % COLOR_COUNT]
    }

    /// Color whose turn follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Square where this color's pawns enter the default 32-square ring.
    #[must_use]
    pub const fn entry_square(self) -> usize {
        match self {
            Color::Red => 26,
            Color::Green => 2,
            Color::Blue => 10,
            Color::Purple => 18,
        }
    }

    /// Lower-case name for display.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One logical pawn: a color plus the pawn number within that color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PawnTag {
    pub color: Color,
    pub pawn: u8,
}

impl PawnTag {
    /// Create a pawn tag. Pawn numbers wrap at [`PAWNS_PER_COLOR`].
    #[must_use]
    pub const fn new(color: Color, pawn: u8) -> Self {
        Self {
            color,
            pawn: pawn % PAWNS_PER_COLOR,
        }
    }
}

impl std::fmt::Display for PawnTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.color, self.pawn)
    }
}

/// Caller-owned picture of the board: which pawn sits in each home slot and
/// on each board square. Stored next to every history snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupancy {
    pub home: Vec<Option<PawnTag>>,
    pub board: Vec<Option<PawnTag>>,
}

impl Occupancy {
    /// Starting occupancy: every pawn at home, empty board.
    #[must_use]
    pub fn initial(squares: usize) -> Self {
        let home = Color::ALL
            .iter()
            .flat_map(|&c| (0..PAWNS_PER_COLOR).map(move |p| Some(PawnTag::new(c, p))))
            .collect();
        Self {
            home,
            board: vec![None; squares],
        }
    }

    /// Board squares holding any pawn, in index order.
    #[must_use]
    pub fn occupied_squares(&self) -> Vec<usize> {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|_| i))
            .collect()
    }

    /// Board squares holding `tag`, in index order.
    #[must_use]
    pub fn squares_of(&self, tag: PawnTag) -> Vec<usize> {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| (*slot == Some(tag)).then_some(i))
            .collect()
    }

    /// (square, color) pairs for every occupied board square.
    ///
    /// This is the shape the measurement basis selector expects.
    #[must_use]
    pub fn colors_by_square(&self) -> Vec<(usize, Color)> {
        self.board
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|tag| (i, tag.color)))
            .collect()
    }
}
