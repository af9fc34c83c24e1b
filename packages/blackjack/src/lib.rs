mod card;
mod config;
pub mod dealer;
mod engine;
mod error;
mod hand;
mod rules;
mod shoe;
mod simulation;
mod strategy;

pub use card::Rank;
pub use config::SimulationConfig;
pub use engine::{play_out, resolve, Deal, PendingHand, Resolution, Settlement};
pub use error::BlackjackError;
pub use hand::{can_split_cards, is_blackjack, is_busted, total_and_softness, Hand, Outcome};
pub use rules::{BlackjackPayout, RuleSet};
pub use shoe::{CardSource, InfiniteShoe, StackedShoe};
pub use simulation::{
    play_hands, run, run_sharded, ActionTally, Counters, Histogram, OutcomeTally, Summary,
};
pub use strategy::{decide, recommend, Action};
