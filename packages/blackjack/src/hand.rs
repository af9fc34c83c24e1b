use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Rank;

/// How a single (sub)hand settled against the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Push,
    Surrender,
}

/// Total of a blackjack hand and whether an Ace is currently counted as 11.
///
/// Aces start at 1 and are promoted by 10 while the total stays at or
/// below 21. A total above 21 is returned unchanged; the caller decides
/// what a bust means.
pub fn total_and_softness(cards: &[Rank]) -> (u8, bool) {
    assert!(!cards.is_empty(), "hand evaluated with no cards");

    // Saturates at u8::MAX, which is still a bust.
    let mut total: u8 = 0;
    let mut aces = 0;
    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total = total.saturating_add(card.value());
    }

    let mut soft = false;
    while aces > 0 && total <= 11 {
        total += 10;
        soft = true;
        aces -= 1;
    }

    (total, soft)
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Rank]) -> bool {
    total_and_softness(cards).0 > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Rank]) -> bool {
    cards.len() == 2 && total_and_softness(cards).0 == 21
}

/// Two cards form a splittable pair only when their ranks are identical,
/// so a Jack and a King are not a pair.
pub fn can_split_cards(card1: &Rank, card2: &Rank) -> bool {
    card1 == card2
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Rank>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: &[Rank]) -> Self {
        Self {
            cards: cards.to_vec(),
        }
    }

    pub fn total(&self) -> u8 {
        total_and_softness(&self.cards).0
    }

    pub fn is_soft(&self) -> bool {
        total_and_softness(&self.cards).1
    }

    pub fn is_busted(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn add_card(&mut self, card: Rank) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rank::*;

    #[test]
    fn test_total_simple() {
        assert_eq!(total_and_softness(&[Two, Three]), (5, false));
    }

    #[test]
    fn test_total_with_face_cards() {
        assert_eq!(total_and_softness(&[King, Queen]), (20, false));
    }

    #[test]
    fn test_non_ace_hands_are_hard_raw_sums() {
        for a in Rank::ALL.iter().filter(|r| !r.is_ace()) {
            for b in Rank::ALL.iter().filter(|r| !r.is_ace()) {
                for c in Rank::ALL.iter().filter(|r| !r.is_ace()) {
                    let cards = [*a, *b, *c];
                    let raw: u8 = cards.iter().map(|r| r.value()).sum();
                    assert_eq!(total_and_softness(&cards), (raw, false));
                }
            }
        }
    }

    #[test]
    fn test_soft_ace() {
        assert_eq!(total_and_softness(&[Ace, Six]), (17, true));
    }

    #[test]
    fn test_hard_ace() {
        assert_eq!(total_and_softness(&[Ace, Six, Nine]), (16, false));
    }

    #[test]
    fn test_multiple_aces() {
        assert_eq!(total_and_softness(&[Ace, Ace, Nine]), (21, true));
        assert_eq!(total_and_softness(&[Ace, Ace]), (12, true));
        assert_eq!(total_and_softness(&[Ace, Ace, Ace, Ace]), (14, true));
    }

    #[test]
    fn test_bust_keeps_all_aces_low() {
        assert_eq!(total_and_softness(&[Ace, King, Queen, Five]), (26, false));
    }

    #[test]
    fn test_total_is_best_achievable() {
        // Brute force every 1/11 assignment of Aces over a few shapes.
        let hands: [&[Rank]; 5] = [
            &[Ace, Ace, Ace, Eight],
            &[Ace, Nine, Ace],
            &[Ace, Five, Five],
            &[Ace, Ace, King, King],
            &[Seven, Ace, Two, Ace],
        ];
        for cards in hands {
            let aces = cards.iter().filter(|r| r.is_ace()).count() as u8;
            let base: u8 = cards.iter().map(|r| r.value()).sum();
            let best = (0..=aces)
                .map(|promoted| base + 10 * promoted)
                .filter(|t| *t <= 21)
                .max()
                .unwrap_or(base);
            assert_eq!(total_and_softness(cards).0, best, "{cards:?}");
        }
    }

    #[test]
    fn test_oversized_hand_saturates_as_bust() {
        let cards = [King; 30];
        assert_eq!(total_and_softness(&cards), (u8::MAX, false));
        assert!(is_busted(&cards));

        let mut with_ace = vec![Ace];
        with_ace.extend([Ten; 26]);
        assert_eq!(total_and_softness(&with_ace), (u8::MAX, false));
    }

    #[test]
    #[should_panic(expected = "hand evaluated with no cards")]
    fn test_empty_hand_is_a_defect() {
        total_and_softness(&[]);
    }

    #[test]
    fn test_is_busted() {
        assert!(is_busted(&[King, Queen, Five]));
        assert!(!is_busted(&[King, Queen]));
    }

    #[test]
    fn test_is_blackjack() {
        assert!(is_blackjack(&[Ace, King]));
        assert!(is_blackjack(&[Ten, Ace]));
    }

    #[test]
    fn test_not_blackjack_three_cards() {
        assert!(!is_blackjack(&[Seven, Seven, Seven]));
    }

    #[test]
    fn test_not_blackjack_wrong_value() {
        assert!(!is_blackjack(&[King, Queen]));
    }

    #[test]
    fn test_can_split_cards() {
        assert!(can_split_cards(&Eight, &Eight));
        assert!(!can_split_cards(&Eight, &Nine));
        assert!(!can_split_cards(&King, &Queen));
    }

    #[test]
    fn test_hand_struct() {
        let mut hand = Hand::new();
        hand.add_card(King);
        hand.add_card(Seven);
        assert_eq!(hand.total(), 17);
        assert!(!hand.is_soft());
        assert!(!hand.is_pair());
        assert_eq!(hand.to_string(), "K 7");
    }

    #[test]
    fn test_hand_struct_pair_needs_two_cards() {
        let mut hand = Hand::from_cards(&[Eight, Eight]);
        assert!(hand.is_pair());
        hand.add_card(Two);
        assert!(!hand.is_pair());
    }
}
