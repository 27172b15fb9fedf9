use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr, IntoStaticStr};

/// Key mode of a chart (4B, 5B, 6B, 8B)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    FromRepr,
    IntoStaticStr,
    Display,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Button {
    #[default]
    #[strum(serialize = "4B")]
    B4 = 4,
    #[strum(serialize = "5B")]
    B5 = 5,
    #[strum(serialize = "6B")]
    B6 = 6,
    #[strum(serialize = "8B")]
    B8 = 8,
}

impl Button {
    /// Every button mode, in display order
    pub const ALL: [Button; 4] = [Button::B4, Button::B5, Button::B6, Button::B8];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Number of keys (used in API paths)
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

impl TryFrom<u8> for Button {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or_else(|| format!("unknown button: {}", value))
    }
}

impl From<Button> for u8 {
    fn from(button: Button) -> Self {
        button.number()
    }
}

/// Difficulty board of the archive (level floors plus MX and SC boards)
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum Board {
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    Level1,
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Level2,
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Level3,
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Level4,
    #[strum(serialize = "5")]
    #[serde(rename = "5")]
    Level5,
    #[strum(serialize = "6")]
    #[serde(rename = "6")]
    Level6,
    #[strum(serialize = "7")]
    #[serde(rename = "7")]
    Level7,
    #[strum(serialize = "8")]
    #[serde(rename = "8")]
    Level8,
    #[strum(serialize = "9")]
    #[serde(rename = "9")]
    Level9,
    #[strum(serialize = "10")]
    #[serde(rename = "10")]
    Level10,
    #[strum(serialize = "11")]
    #[serde(rename = "11")]
    Level11,
    #[strum(serialize = "MX")]
    #[serde(rename = "MX")]
    Mx,
    #[strum(serialize = "SC")]
    #[serde(rename = "SC")]
    Sc,
    #[strum(serialize = "SC5")]
    #[serde(rename = "SC5")]
    Sc5,
    #[strum(serialize = "SC10")]
    #[serde(rename = "SC10")]
    Sc10,
    #[strum(serialize = "SC15")]
    #[serde(rename = "SC15")]
    Sc15,
}

impl Board {
    /// Every board the archive offers, in request order
    pub const ALL: [Board; 16] = [
        Board::Level1,
        Board::Level2,
        Board::Level3,
        Board::Level4,
        Board::Level5,
        Board::Level6,
        Board::Level7,
        Board::Level8,
        Board::Level9,
        Board::Level10,
        Board::Level11,
        Board::Mx,
        Board::Sc,
        Board::Sc5,
        Board::Sc10,
        Board::Sc15,
    ];

    /// Path segment used by the board endpoint
    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

/// Every (button, board) combination, button-major
pub fn board_combinations() -> Vec<(Button, Board)> {
    Button::ALL
        .iter()
        .flat_map(|&button| Board::ALL.iter().map(move |&board| (button, board)))
        .collect()
}
