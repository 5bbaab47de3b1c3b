//! Core card-related types: Card, CardType, CardColor

use serde::{Deserialize, Serialize};

/// Card families. Five of them form duos, the rest are collected.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Boat,
    Fish,
    Swimmer,
    Shark,
    Crab,
    Shell,
    Octopus,
    Sirene,
    Pinguin,
    Marine,
}

impl CardType {
    pub const ALL: [CardType; 10] = [
        CardType::Boat,
        CardType::Fish,
        CardType::Swimmer,
        CardType::Shark,
        CardType::Crab,
        CardType::Shell,
        CardType::Octopus,
        CardType::Sirene,
        CardType::Pinguin,
        CardType::Marine,
    ];

    /// Id prefix used by the catalog (`crab_3`, `crab_imp`).
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Boat => "boat",
            CardType::Fish => "fish",
            CardType::Swimmer => "swimmer",
            CardType::Shark => "shark",
            CardType::Crab => "crab",
            CardType::Shell => "shell",
            CardType::Octopus => "octopus",
            CardType::Sirene => "sirene",
            CardType::Pinguin => "pinguin",
            CardType::Marine => "marine",
        }
    }

    /// Types that may appear in a duo.
    pub const fn is_duo_type(self) -> bool {
        matches!(
            self,
            CardType::Boat | CardType::Crab | CardType::Fish | CardType::Swimmer | CardType::Shark
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardColor {
    Black,
    DarkBlue,
    LightBlue,
    LightGray,
    LightGreen,
    LightOrange,
    LightPink,
    Orange,
    Purple,
    White,
    Yellow,
}

impl CardColor {
    pub const ALL: [CardColor; 11] = [
        CardColor::Black,
        CardColor::DarkBlue,
        CardColor::LightBlue,
        CardColor::LightGray,
        CardColor::LightGreen,
        CardColor::LightOrange,
        CardColor::LightPink,
        CardColor::Orange,
        CardColor::Purple,
        CardColor::White,
        CardColor::Yellow,
    ];
}

/// Reserved id suffix of the multiplier card of a type.
pub const IMPROVE_SUFFIX: &str = "_imp";

/// An immutable card value. Identity is the `id`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CardType,
    pub color: CardColor,
    #[serde(default)]
    pub improve: bool,
}

impl Card {
    pub fn new(id: impl Into<String>, kind: CardType, color: CardColor) -> Self {
        Self {
            id: id.into(),
            kind,
            color,
            improve: false,
        }
    }

    /// The multiplier card of `kind`, id `<type>_imp`.
    pub fn improved(kind: CardType, color: CardColor) -> Self {
        Self {
            id: format!("{}{IMPROVE_SUFFIX}", kind.as_str()),
            kind,
            color,
            improve: true,
        }
    }

    pub fn is(&self, kind: CardType) -> bool {
        self.kind == kind
    }
}
