use log::trace;
use serde::{Deserialize, Serialize};

use crate::strategy::{decide, Action};
use crate::{dealer, CardSource, Hand, Outcome, Rank, RuleSet};

/// A hand still waiting to be played, either the opening hand or one half
/// of a split.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingHand {
    pub cards: Hand,
    /// Wager in units of the opening bet.
    pub bet: f64,
    /// Splits behind this hand. The half that keeps playing after a split
    /// keeps its count; only the set-aside half gets one more.
    pub splits_so_far: u8,
    pub can_double: bool,
}

impl PendingHand {
    fn opening(cards: Hand) -> Self {
        Self {
            cards,
            bet: 1.0,
            splits_so_far: 0,
            can_double: true,
        }
    }
}

/// What ended a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Dealer turned up a natural on the peek.
    DealerBlackjack,
    /// Both sides were dealt a natural and the dealer peeked.
    BlackjackPush,
    Blackjack,
    Surrendered,
    Busted { total: u8 },
    Showdown { player_total: u8, dealer_total: u8 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub hand: Hand,
    pub outcome: Outcome,
    /// Signed result in units of the opening bet.
    pub payoff: f64,
    pub resolution: Resolution,
    pub doubled: bool,
}

impl Settlement {
    fn natural(hand: Hand, outcome: Outcome, payoff: f64, resolution: Resolution) -> Self {
        Self {
            hand,
            outcome,
            payoff,
            resolution,
            doubled: false,
        }
    }

    pub fn dealer_busted(&self) -> bool {
        matches!(self.resolution, Resolution::Showdown { dealer_total, .. } if dealer_total > 21)
    }
}

/// Everything that happened on one initial deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub player: Hand,
    pub dealer: Hand,
    /// Total splits made on this deal.
    pub splits: u32,
    /// One entry per hand played, so `splits + 1` entries.
    pub settlements: Vec<Settlement>,
}

impl Deal {
    pub fn outcomes(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        self.settlements.iter().map(|s| (s.outcome, s.payoff))
    }

    pub fn payoff(&self) -> f64 {
        self.settlements.iter().map(|s| s.payoff).sum()
    }

    pub fn doubles(&self) -> usize {
        self.settlements.iter().filter(|s| s.doubled).count()
    }
}

/// Deal two cards each from `source` and play the round out.
pub fn resolve<S: CardSource + ?Sized>(rules: &RuleSet, source: &mut S) -> Deal {
    let player = Hand::from_cards(&[source.draw(), source.draw()]);
    let dealer = Hand::from_cards(&[source.draw(), source.draw()]);
    play_out(rules, player, dealer, source)
}

/// Play a round from already-dealt two-card hands. The first dealer card
/// is the upcard.
pub fn play_out<S: CardSource + ?Sized>(
    rules: &RuleSet,
    player: Hand,
    dealer: Hand,
    source: &mut S,
) -> Deal {
    assert!(
        player.len() == 2 && dealer.len() == 2,
        "round must start from two cards each, got {} and {}",
        player.len(),
        dealer.len()
    );
    let upcard = dealer.cards[0];
    let dealer_blackjack = dealer.is_blackjack();
    let player_blackjack = player.is_blackjack();

    if rules.dealer_peek && upcard.decision_value() >= 10 && dealer_blackjack {
        let settlement = if player_blackjack {
            Settlement::natural(player.clone(), Outcome::Push, 0.0, Resolution::BlackjackPush)
        } else {
            Settlement::natural(player.clone(), Outcome::Loss, -1.0, Resolution::DealerBlackjack)
        };
        return Deal {
            player,
            dealer,
            splits: 0,
            settlements: vec![settlement],
        };
    }

    // Without a peek an unseen dealer natural does not stop the payout.
    if player_blackjack {
        let settlement = Settlement::natural(
            player.clone(),
            Outcome::Win,
            rules.blackjack_payout.multiple(),
            Resolution::Blackjack,
        );
        return Deal {
            player,
            dealer,
            splits: 0,
            settlements: vec![settlement],
        };
    }

    let mut splits = 0u32;
    let mut settlements = Vec::new();
    let mut stack = vec![PendingHand::opening(player.clone())];

    while let Some(mut unit) = stack.pop() {
        let mut doubled = false;
        let settlement = loop {
            let can_split = unit.cards.is_pair() && unit.splits_so_far < rules.resplit_limit;
            let action = decide(
                &unit.cards.cards,
                &upcard,
                unit.can_double,
                can_split,
                rules.late_surrender,
            );
            trace!("{} vs {upcard} (bet {}): {action:?}", unit.cards, unit.bet);

            match action {
                Action::Surrender => {
                    break Settlement {
                        payoff: -0.5 * unit.bet,
                        hand: unit.cards,
                        outcome: Outcome::Surrender,
                        resolution: Resolution::Surrendered,
                        doubled,
                    };
                }
                Action::Split => {
                    splits += 1;
                    let rank = unit.cards.cards[0];
                    let first = split_hand(rank, source);
                    let second = split_hand(rank, source);
                    stack.push(PendingHand {
                        cards: second,
                        bet: unit.bet,
                        splits_so_far: unit.splits_so_far + 1,
                        can_double: rules.double_after_split,
                    });
                    unit.cards = first;
                    unit.can_double = rules.double_after_split;
                }
                Action::Double => {
                    unit.cards.add_card(source.draw());
                    unit.bet *= 2.0;
                    doubled = true;
                    break settle(unit, doubled, &dealer, rules, source);
                }
                Action::Hit => {
                    unit.cards.add_card(source.draw());
                    if unit.cards.is_busted() {
                        break settle(unit, doubled, &dealer, rules, source);
                    }
                    unit.can_double = false;
                }
                Action::Stand => break settle(unit, doubled, &dealer, rules, source),
            }
        };
        settlements.push(settlement);
    }

    Deal {
        player,
        dealer,
        splits,
        settlements,
    }
}

fn split_hand<S: CardSource + ?Sized>(rank: Rank, source: &mut S) -> Hand {
    Hand::from_cards(&[rank, source.draw()])
}

/// Settle a finished hand. A busted hand loses its bet without the dealer
/// playing; otherwise the dealer plays from the dealt cards.
fn settle<S: CardSource + ?Sized>(
    unit: PendingHand,
    doubled: bool,
    dealer_hand: &Hand,
    rules: &RuleSet,
    source: &mut S,
) -> Settlement {
    let player_total = unit.cards.total();
    if player_total > 21 {
        return Settlement {
            hand: unit.cards,
            outcome: Outcome::Loss,
            payoff: -unit.bet,
            resolution: Resolution::Busted {
                total: player_total,
            },
            doubled,
        };
    }

    let dealer_total = dealer::play(dealer_hand, rules.hit_soft_17, source).total();
    let (outcome, payoff) = if dealer_total > 21 || player_total > dealer_total {
        (Outcome::Win, unit.bet)
    } else if player_total < dealer_total {
        (Outcome::Loss, -unit.bet)
    } else {
        (Outcome::Push, 0.0)
    };

    Settlement {
        hand: unit.cards,
        outcome,
        payoff,
        resolution: Resolution::Showdown {
            player_total,
            dealer_total,
        },
        doubled,
    }
}
