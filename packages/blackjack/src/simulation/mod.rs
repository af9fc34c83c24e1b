use std::ops::AddAssign;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::{resolve, Deal, Resolution};
use crate::{BlackjackError, CardSource, InfiniteShoe, Outcome, RuleSet, SimulationConfig};

/// Outcome buckets. Several events land in two buckets at once: a
/// surrender is also a loss, a dealer natural on the peek is also a loss,
/// and a blackjack push is also a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub win: u64,
    pub loss: u64,
    pub push: u64,
    pub surrender: u64,
    pub blackjack_win: u64,
    pub blackjack_push: u64,
    pub dealer_bust_win: u64,
    pub dealer_blackjack: u64,
}

impl AddAssign for OutcomeTally {
    fn add_assign(&mut self, rhs: Self) {
        self.win += rhs.win;
        self.loss += rhs.loss;
        self.push += rhs.push;
        self.surrender += rhs.surrender;
        self.blackjack_win += rhs.blackjack_win;
        self.blackjack_push += rhs.blackjack_push;
        self.dealer_bust_win += rhs.dealer_bust_win;
        self.dealer_blackjack += rhs.dealer_blackjack;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTally {
    pub splits: u64,
    pub doubles: u64,
    pub player_bust: u64,
    pub dealer_bust: u64,
}

impl AddAssign for ActionTally {
    fn add_assign(&mut self, rhs: Self) {
        self.splits += rhs.splits;
        self.doubles += rhs.doubles;
        self.player_bust += rhs.player_bust;
        self.dealer_bust += rhs.dealer_bust;
    }
}

/// Counts of final totals over a fixed key range, plus a bust bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    low: u8,
    counts: Vec<u64>,
    bust: u64,
}

impl Histogram {
    pub fn new(low: u8, high: u8) -> Self {
        assert!(low <= high && high <= 21, "bad histogram range {low}..={high}");
        Self {
            low,
            counts: vec![0; (high - low + 1) as usize],
            bust: 0,
        }
    }

    pub fn record(&mut self, total: u8) {
        let index = total
            .checked_sub(self.low)
            .map(usize::from)
            .filter(|i| *i < self.counts.len());
        match index {
            Some(i) => self.counts[i] += 1,
            None => panic!("total {total} outside histogram keys {:?}", self.keys()),
        }
    }

    pub fn record_bust(&mut self) {
        self.bust += 1;
    }

    pub fn get(&self, total: u8) -> u64 {
        total
            .checked_sub(self.low)
            .and_then(|i| self.counts.get(usize::from(i)))
            .copied()
            .unwrap_or(0)
    }

    pub fn bust(&self) -> u64 {
        self.bust
    }

    pub fn keys(&self) -> std::ops::RangeInclusive<u8> {
        self.low..=self.low + (self.counts.len() - 1) as u8
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.keys().zip(self.counts.iter().copied())
    }

    /// Every recorded hand, bust bucket included.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum::<u64>() + self.bust
    }
}

impl AddAssign for Histogram {
    fn add_assign(&mut self, rhs: Self) {
        assert_eq!(self.keys(), rhs.keys(), "merging histograms with different keys");
        for (mine, theirs) in self.counts.iter_mut().zip(rhs.counts) {
            *mine += theirs;
        }
        self.bust += rhs.bust;
    }
}

/// Raw, un-normalised counts for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub outcomes: OutcomeTally,
    pub actions: ActionTally,
    /// Final totals of hands that reached the dealer, 4..=21
    pub player_totals: Histogram,
    /// Dealer finishing totals, 17..=21
    pub dealer_totals: Histogram,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            outcomes: OutcomeTally::default(),
            actions: ActionTally::default(),
            player_totals: Histogram::new(4, 21),
            dealer_totals: Histogram::new(17, 21),
        }
    }
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, deal: &Deal) {
        self.actions.splits += u64::from(deal.splits);

        for settlement in &deal.settlements {
            if settlement.doubled {
                self.actions.doubles += 1;
            }

            match settlement.resolution {
                Resolution::DealerBlackjack => {
                    self.outcomes.loss += 1;
                    self.outcomes.dealer_blackjack += 1;
                }
                Resolution::BlackjackPush => {
                    self.outcomes.push += 1;
                    self.outcomes.blackjack_push += 1;
                }
                Resolution::Blackjack => {
                    self.outcomes.win += 1;
                    self.outcomes.blackjack_win += 1;
                }
                Resolution::Surrendered => {
                    self.outcomes.loss += 1;
                    self.outcomes.surrender += 1;
                }
                Resolution::Busted { .. } => {
                    self.outcomes.loss += 1;
                    self.actions.player_bust += 1;
                    self.player_totals.record_bust();
                }
                Resolution::Showdown {
                    player_total,
                    dealer_total,
                } => {
                    self.player_totals.record(player_total);
                    let dealer_busted = dealer_total > 21;
                    if dealer_busted {
                        self.actions.dealer_bust += 1;
                        self.dealer_totals.record_bust();
                    } else {
                        self.dealer_totals.record(dealer_total.max(17));
                    }

                    match settlement.outcome {
                        Outcome::Win => {
                            self.outcomes.win += 1;
                            if dealer_busted {
                                self.outcomes.dealer_bust_win += 1;
                            }
                        }
                        Outcome::Loss => self.outcomes.loss += 1,
                        Outcome::Push => self.outcomes.push += 1,
                        Outcome::Surrender => {
                            unreachable!("surrendered hand reached the dealer")
                        }
                    }
                }
            }
        }
    }
}

impl AddAssign for Counters {
    fn add_assign(&mut self, rhs: Self) {
        self.outcomes += rhs.outcomes;
        self.actions += rhs.actions;
        self.player_totals += rhs.player_totals;
        self.dealer_totals += rhs.dealer_totals;
    }
}

/// Headline numbers for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub hands_simulated: u64,
    pub rule_label: String,
    /// Rates are fractions of win + loss + push tallies.
    pub win_rate: f64,
    pub loss_rate: f64,
    pub push_rate: f64,
    /// Expected return per initial unit bet for the player.
    pub ev_per_initial_bet: f64,
    /// Positive means house advantage.
    pub house_edge: f64,
}

impl Summary {
    pub fn new(hands: u64, rules: &RuleSet, counters: &Counters, total_units: f64) -> Self {
        let outcomes = &counters.outcomes;
        let resolved = outcomes.win + outcomes.loss + outcomes.push;
        let rate = |count: u64| {
            if resolved == 0 {
                0.0
            } else {
                count as f64 / resolved as f64
            }
        };
        let ev = if hands == 0 {
            0.0
        } else {
            total_units / hands as f64
        };

        Self {
            hands_simulated: hands,
            rule_label: rules.label().to_string(),
            win_rate: rate(outcomes.win),
            loss_rate: rate(outcomes.loss),
            push_rate: rate(outcomes.push),
            ev_per_initial_bet: ev,
            house_edge: -ev,
        }
    }
}

/// Counters and net payoff from playing `hands` deals off one source.
pub fn play_hands<S: CardSource + ?Sized>(hands: u64, rules: &RuleSet, source: &mut S) -> (Counters, f64) {
    let mut counters = Counters::new();
    let mut total_units = 0.0;
    for _ in 0..hands {
        let deal = resolve(rules, source);
        total_units += deal.payoff();
        counters.record(&deal);
    }
    (counters, total_units)
}

/// Run the configured number of hands on a single thread.
pub fn run(config: &SimulationConfig) -> Result<(Summary, Counters), BlackjackError> {
    config.validate()?;
    info!(
        "Simulating {} hands ({}), seed {:?}",
        config.hands, config.rules, config.seed
    );

    let mut shoe = InfiniteShoe::new(config.seed);
    let (counters, total_units) = play_hands(config.hands, &config.rules, &mut shoe);
    let summary = Summary::new(config.hands, &config.rules, &counters, total_units);

    info!(
        "Finished {} hands: EV {:+.5} per initial bet",
        summary.hands_simulated, summary.ev_per_initial_bet
    );
    Ok((summary, counters))
}

/// Spread the hands over `shards` rayon tasks, each with its own shoe.
///
/// Shard `i` is seeded with `seed + i`, so a given seed and shard count
/// always reproduce the same result. Without a seed, a base seed is drawn
/// from entropy.
pub fn run_sharded(
    config: &SimulationConfig,
    shards: usize,
) -> Result<(Summary, Counters), BlackjackError> {
    config.validate()?;
    if shards == 0 {
        return Err(BlackjackError::InvalidConfiguration(
            "shard count must be positive".to_string(),
        ));
    }

    let base_seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "Simulating {} hands ({}) over {} shards, base seed {}",
        config.hands, config.rules, shards, base_seed
    );

    let shard_count = shards as u64;
    let per_shard = config.hands / shard_count;
    let remainder = config.hands % shard_count;

    let results: Vec<(Counters, f64)> = (0..shard_count)
        .into_par_iter()
        .map(|shard| {
            let hands = per_shard + u64::from(shard < remainder);
            let seed = base_seed.wrapping_add(shard);
            debug!("Shard {shard}: {hands} hands, seed {seed}");
            let mut shoe = InfiniteShoe::seeded(seed);
            play_hands(hands, &config.rules, &mut shoe)
        })
        .collect();

    // Merge in shard order so the float sum is reproducible.
    let mut counters = Counters::new();
    let mut total_units = 0.0;
    for (shard_counters, shard_units) in results {
        counters += shard_counters;
        total_units += shard_units;
    }

    let summary = Summary::new(config.hands, &config.rules, &counters, total_units);
    info!(
        "Finished {} hands: EV {:+.5} per initial bet",
        summary.hands_simulated, summary.ev_per_initial_bet
    );
    Ok((summary, counters))
}
