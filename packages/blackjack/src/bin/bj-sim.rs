use blackjack::{run, run_sharded, BlackjackError, RuleSet, SimulationConfig};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "bj-sim",
    about = "Monte Carlo blackjack: outcome distributions and EV for a rule set"
)]
struct Args {
    /// Load the whole configuration from a JSON file; other flags are ignored
    #[arg(long)]
    config: Option<String>,

    /// Use a preset: default, s17, european, six_to_five
    #[arg(long)]
    preset: Option<String>,

    /// Number of initial hands to simulate
    #[arg(short = 'n', long, default_value = "300000")]
    hands: u64,

    /// RNG seed for reproducibility (omit for a random run)
    #[arg(long)]
    seed: Option<u64>,

    /// Dealer hits soft 17
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    dealer_hits_soft_17: bool,

    /// Allow late surrender
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    late_surrender: bool,

    /// Double after split allowed
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    double_after_split: bool,

    /// Dealer peeks for blackjack
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    dealer_peek: bool,

    /// Maximum splits per hand (0 = no splitting)
    #[arg(long, default_value = "3")]
    resplit_limit: u8,

    /// Blackjack payout ratio: "3:2" or "6:5"
    #[arg(long, default_value = "3:2")]
    blackjack_payout: String,

    /// Split the run over this many worker threads
    #[arg(long, default_value = "1")]
    shards: usize,

    /// Print summary and raw counters as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = simulate(&args) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn simulate(args: &Args) -> Result<(), BlackjackError> {
    let config = build_config(args)?;
    let rules = &config.rules;

    eprintln!("Configuration:");
    eprintln!("  Hands:              {}", config.hands);
    match config.seed {
        Some(seed) => eprintln!("  Seed:               {seed}"),
        None => eprintln!("  Seed:               (entropy)"),
    }
    eprintln!(
        "  Dealer soft 17:     {}",
        if rules.hit_soft_17 { "hits" } else { "stands" }
    );
    eprintln!("  Dealer peeks:       {}", rules.dealer_peek);
    eprintln!("  Late surrender:     {}", rules.late_surrender);
    eprintln!("  Double after split: {}", rules.double_after_split);
    eprintln!("  Resplit limit:      {}", rules.resplit_limit);
    eprintln!("  BJ payout:          {}", rules.blackjack_payout);

    let (summary, counters) = if args.shards > 1 {
        run_sharded(&config, args.shards)?
    } else {
        run(&config)?
    };

    if args.json {
        let report = serde_json::json!({ "summary": summary, "counters": counters });
        let text = serde_json::to_string_pretty(&report)?;
        println!("{text}");
        return Ok(());
    }

    println!();
    println!("Rule: {}", summary.rule_label);
    println!("Hands simulated: {}", summary.hands_simulated);
    println!("Win:  {:.2}%", summary.win_rate * 100.0);
    println!("Loss: {:.2}%", summary.loss_rate * 100.0);
    println!("Push: {:.2}%", summary.push_rate * 100.0);
    println!("EV per initial bet: {:.3}%", summary.ev_per_initial_bet * 100.0);

    let outcomes = &counters.outcomes;
    println!();
    println!("Blackjacks:  {}", outcomes.blackjack_win);
    println!("Surrenders:  {}", outcomes.surrender);
    println!("Splits:      {}", counters.actions.splits);
    println!("Doubles:     {}", counters.actions.doubles);
    println!("Player bust: {}", counters.actions.player_bust);
    println!("Dealer bust: {}", counters.actions.dealer_bust);

    let dealer_hands = counters.dealer_totals.total().max(1) as f64;
    println!();
    println!("Dealer final totals:");
    for (total, count) in counters.dealer_totals.iter() {
        println!("  {total:>4}: {:6.2}%", count as f64 / dealer_hands * 100.0);
    }
    println!(
        "  Bust: {:6.2}%",
        counters.dealer_totals.bust() as f64 / dealer_hands * 100.0
    );

    Ok(())
}

fn build_config(args: &Args) -> Result<SimulationConfig, BlackjackError> {
    if let Some(path) = &args.config {
        return SimulationConfig::load(path);
    }

    let rules = match &args.preset {
        Some(preset) => RuleSet::preset(preset)?,
        None => RuleSet {
            hit_soft_17: args.dealer_hits_soft_17,
            late_surrender: args.late_surrender,
            double_after_split: args.double_after_split,
            resplit_limit: args.resplit_limit,
            dealer_peek: args.dealer_peek,
            blackjack_payout: args.blackjack_payout.parse()?,
        },
    };

    let config = SimulationConfig::new(args.hands, args.seed, rules);
    config.validate()?;
    Ok(config)
}
