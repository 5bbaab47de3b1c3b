//! Card point arithmetic. Pure functions over a player's card multiset.

use std::collections::{HashMap, HashSet};

use crate::domain::rules::SIRENS_FOR_IMMEDIATE_WIN;
use crate::domain::state::PlayerState;
use crate::domain::{Card, CardColor, CardType};

const SHELL_POINTS: [u32; 7] = [0, 0, 2, 4, 6, 8, 10];
const OCTOPUS_POINTS: [u32; 6] = [0, 0, 3, 6, 9, 12];
const PINGUIN_POINTS: [u32; 4] = [0, 1, 3, 5];

const DUO_POINTS: u32 = 2;
const IMPROVE_MULTIPLIER: u32 = 3;
const MARINE_POINTS: u32 = 5;

/// Per-type and per-color counts of a card multiset.
#[derive(Debug, Default)]
struct CardTally {
    /// Non-improve cards by type.
    regular: HashMap<CardType, u32>,
    /// All cards by type, improve cards included.
    total: HashMap<CardType, u32>,
    improved: HashSet<CardType>,
    colors: HashMap<CardColor, u32>,
}

impl CardTally {
    fn from_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Self {
        let mut tally = CardTally::default();
        for card in cards {
            *tally.total.entry(card.kind).or_default() += 1;
            if card.improve {
                tally.improved.insert(card.kind);
            } else {
                *tally.regular.entry(card.kind).or_default() += 1;
            }
            *tally.colors.entry(card.color).or_default() += 1;
        }
        tally
    }

    fn regular(&self, kind: CardType) -> u32 {
        self.regular.get(&kind).copied().unwrap_or(0)
    }

    fn total(&self, kind: CardType) -> u32 {
        self.total.get(&kind).copied().unwrap_or(0)
    }

    fn has_improve(&self, kind: CardType) -> bool {
        self.improved.contains(&kind)
    }

    fn largest_color_group(&self) -> u32 {
        self.colors.values().copied().max().unwrap_or(0)
    }

    fn duo_points(&self) -> u32 {
        let mut points = 0;
        for kind in [CardType::Boat, CardType::Crab, CardType::Fish] {
            let mut pts = (self.regular(kind) / 2) * DUO_POINTS;
            if self.has_improve(kind) {
                pts *= IMPROVE_MULTIPLIER;
            }
            points += pts;
        }

        let pairs = self.regular(CardType::Swimmer).min(self.regular(CardType::Shark));
        let mut pts = pairs * DUO_POINTS;
        if self.has_improve(CardType::Swimmer) || self.has_improve(CardType::Shark) {
            pts *= IMPROVE_MULTIPLIER;
        }
        points + pts
    }

    fn collection_points(&self) -> u32 {
        table_points(&SHELL_POINTS, self.total(CardType::Shell))
            + table_points(&OCTOPUS_POINTS, self.total(CardType::Octopus))
            + table_points(&PINGUIN_POINTS, self.total(CardType::Pinguin))
    }

    fn siren_points(&self) -> u32 {
        let sirens = self.total(CardType::Sirene) as usize;
        if sirens == 0 {
            return 0;
        }
        let mut groups: Vec<u32> = self.colors.values().copied().collect();
        groups.sort_unstable_by(|a, b| b.cmp(a));
        groups.iter().take(sirens).sum()
    }

    fn marine_points(&self) -> u32 {
        if self.regular(CardType::Marine) < 2 {
            return 0;
        }
        if self.has_improve(CardType::Marine) {
            MARINE_POINTS * IMPROVE_MULTIPLIER
        } else {
            MARINE_POINTS
        }
    }
}

fn table_points(table: &[u32], count: u32) -> u32 {
    let idx = (count as usize).min(table.len() - 1);
    table[idx]
}

/// Points for an arbitrary card multiset.
pub fn score_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    let tally = CardTally::from_cards(cards);
    tally.duo_points() + tally.collection_points() + tally.siren_points() + tally.marine_points()
}

/// Points of a player's hand and played cards together.
pub fn calculate_score(player: &PlayerState) -> u32 {
    score_cards(player.all_cards())
}

/// Size of the player's largest same-color group, 0 with no cards.
pub fn calculate_color_bonus(player: &PlayerState) -> u32 {
    CardTally::from_cards(player.all_cards()).largest_color_group()
}

/// Exactly four sirens among the played cards.
pub fn has_winning_condition(player: &PlayerState) -> bool {
    player
        .played_cards
        .iter()
        .filter(|c| c.kind == CardType::Sirene)
        .count()
        == SIRENS_FOR_IMMEDIATE_WIN
}
