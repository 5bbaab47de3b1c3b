//! The fixed card catalog and shuffling.

use once_cell::sync::Lazy;
use rand::Rng;

use crate::domain::{Card, CardColor, CardType};

/// Regular copies per type, in catalog order.
const REGULAR_COUNTS: [(CardType, usize); 10] = [
    (CardType::Boat, 8),
    (CardType::Crab, 9),
    (CardType::Fish, 7),
    (CardType::Swimmer, 5),
    (CardType::Shark, 5),
    (CardType::Shell, 6),
    (CardType::Octopus, 5),
    (CardType::Pinguin, 3),
    (CardType::Marine, 2),
    (CardType::Sirene, 4),
];

/// Types that carry one multiplier card.
const IMPROVED_TYPES: [CardType; 5] = [
    CardType::Boat,
    CardType::Crab,
    CardType::Fish,
    CardType::Pinguin,
    CardType::Marine,
];

static CATALOG: Lazy<Vec<Card>> = Lazy::new(build_catalog);

fn build_catalog() -> Vec<Card> {
    let mut cards = Vec::new();
    for (kind, count) in REGULAR_COUNTS {
        for n in 1..=count {
            let color = CardColor::ALL[cards.len() % CardColor::ALL.len()];
            cards.push(Card::new(format!("{}_{n}", kind.as_str()), kind, color));
        }
    }
    for kind in IMPROVED_TYPES {
        let color = CardColor::ALL[cards.len() % CardColor::ALL.len()];
        cards.push(Card::improved(kind, color));
    }
    cards
}

/// The full catalog in its fixed order.
pub fn all_cards() -> Vec<Card> {
    CATALOG.clone()
}

pub fn catalog_size() -> usize {
    CATALOG.len()
}

/// A fresh uniformly random permutation of the catalog.
pub fn all_cards_shuffled() -> Vec<Card> {
    shuffled_with(&mut rand::rng())
}

/// Same as [`all_cards_shuffled`] with a caller-supplied random source.
pub fn shuffled_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut cards = all_cards();
    shuffle(&mut cards, rng);
    cards
}

/// Fisher-Yates shuffle.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
