// Proptest generators for domain types.
// Cards are drawn from the real catalog so ids stay unique.

use proptest::prelude::*;
use proptest::sample::{select, subsequence};

use crate::domain::catalog::all_cards;
use crate::domain::Card;

/// Generate a single catalog card
pub fn card() -> impl Strategy<Value = Card> {
    select(all_cards())
}

/// Generate a shuffled set of distinct catalog cards
pub fn card_set(max: usize) -> impl Strategy<Value = Vec<Card>> {
    subsequence(all_cards(), 0..=max).prop_shuffle()
}

/// Generate a card set plus a split point between hand and played cards
pub fn split_card_set(max: usize) -> impl Strategy<Value = (Vec<Card>, usize)> {
    card_set(max).prop_flat_map(|cards| {
        let len = cards.len();
        (Just(cards), 0..=len)
    })
}

/// Seed for a deterministic random source
pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}
