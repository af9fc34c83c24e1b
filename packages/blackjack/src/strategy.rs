use serde::{Deserialize, Serialize};

use crate::hand::{can_split_cards, total_and_softness};
use crate::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
    Surrender,
}

/// Basic strategy for H17, DAS, late surrender.
///
/// Checks run in a fixed order: surrender, pairs, soft totals, hard
/// totals. A table entry that calls for a double or a split turns into a
/// hit when the matching flag is off.
pub fn decide(
    player_cards: &[Rank],
    dealer_up_card: &Rank,
    can_double: bool,
    can_split: bool,
    surrender_allowed: bool,
) -> Action {
    let (player_value, is_soft) = total_and_softness(player_cards);
    let up = dealer_up_card.decision_value();
    let two_cards = player_cards.len() == 2;

    // Late surrender
    if surrender_allowed && two_cards && !is_soft {
        if player_value == 16 && matches!(up, 9..=11) {
            return Action::Surrender;
        }
        if player_value == 15 && up == 10 {
            return Action::Surrender;
        }
    }

    if can_split && two_cards && can_split_cards(&player_cards[0], &player_cards[1]) {
        return pair_action(player_cards[0].decision_value(), up, can_double);
    }

    if is_soft {
        if let Some(action) = soft_action(player_value, up, can_double) {
            return action;
        }
    }

    hard_action(player_value, up, can_double)
}

/// Recommendation for a free-standing hand, with legality taken from the
/// cards alone: doubling on any first two cards, splitting any pair.
pub fn recommend(player_cards: &[Rank], dealer_up_card: &Rank, late_surrender: bool) -> Action {
    let can_double = player_cards.len() == 2;
    let can_split = player_cards.len() == 2 && can_split_cards(&player_cards[0], &player_cards[1]);
    decide(player_cards, dealer_up_card, can_double, can_split, late_surrender)
}

fn double_or(can_double: bool, condition: bool, otherwise: Action) -> Action {
    if can_double && condition {
        Action::Double
    } else {
        otherwise
    }
}

fn split_if(condition: bool, otherwise: Action) -> Action {
    if condition {
        Action::Split
    } else {
        otherwise
    }
}

// Only reached with splitting allowed, so every pair has an answer here.
fn pair_action(pair_value: u8, up: u8, can_double: bool) -> Action {
    match pair_value {
        11 | 8 => Action::Split,
        10 => Action::Stand,
        9 => split_if(matches!(up, 2..=6 | 8 | 9), Action::Stand),
        7 | 3 | 2 => split_if(matches!(up, 2..=7), Action::Hit),
        6 => split_if(matches!(up, 2..=6), Action::Hit),
        5 => double_or(can_double, matches!(up, 2..=9), Action::Hit),
        4 => split_if(matches!(up, 5 | 6), Action::Hit),
        _ => unreachable!("pair of value {pair_value}"),
    }
}

// Soft 12 (a pair of Aces that may not be split) has no row and is
// played off the hard table.
fn soft_action(total: u8, up: u8, can_double: bool) -> Option<Action> {
    let action = match total {
        13 | 14 => double_or(can_double, matches!(up, 5 | 6), Action::Hit),
        15 | 16 => double_or(can_double, matches!(up, 4..=6), Action::Hit),
        17 => {
            let otherwise = if up <= 8 { Action::Stand } else { Action::Hit };
            double_or(can_double, matches!(up, 3..=6), otherwise)
        }
        18 => {
            let otherwise = if matches!(up, 2 | 7 | 8) {
                Action::Stand
            } else {
                Action::Hit
            };
            double_or(can_double, matches!(up, 3..=6), otherwise)
        }
        19..=u8::MAX => Action::Stand,
        _ => return None,
    };
    Some(action)
}

fn hard_action(total: u8, up: u8, can_double: bool) -> Action {
    match total {
        0..=8 => Action::Hit,
        9 => double_or(can_double, matches!(up, 3..=6), Action::Hit),
        10 => double_or(can_double, matches!(up, 2..=9), Action::Hit),
        11 => double_or(can_double, true, Action::Hit),
        12 => {
            if matches!(up, 4..=6) {
                Action::Stand
            } else {
                Action::Hit
            }
        }
        13..=16 => {
            if matches!(up, 2..=6) {
                Action::Stand
            } else {
                Action::Hit
            }
        }
        _ => Action::Stand,
    }
}
