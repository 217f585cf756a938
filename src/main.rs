use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strum::IntoEnumIterator;

use monster_rpg::battle::system::DEFAULT_TURN_LIMIT;
use monster_rpg::species::SpeciesSummary;
use monster_rpg::{
    BattleConfig, BattleEngineError, BattlePlayer, BattleState, BattleSystem, EventBus,
    MonsterInst, ScoringAI, Species, TurnRng,
};

/// Pit two AI-controlled monsters against each other and print the battle log.
#[derive(Debug, Parser)]
#[command(name = "monster-rpg", version)]
struct Args {
    /// Species for player 1
    #[arg(long, default_value = "Sproutle", value_parser = parse_species)]
    p1: Species,

    /// Species for player 2
    #[arg(long, default_value = "Emberpup", value_parser = parse_species)]
    p2: Species,

    /// Level of both monsters
    #[arg(long, default_value_t = 20)]
    level: u8,

    /// Make player 2 a wild monster
    #[arg(long)]
    wild: bool,

    /// Seed for battle rolls and AI choices. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_TURN_LIMIT)]
    max_turns: u32,

    /// RON file overriding the battle tuning constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the event log as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Describe both species and exit without battling
    #[arg(long)]
    describe: bool,
}

fn parse_species(name: &str) -> Result<Species, String> {
    Species::iter()
        .find(|species| species.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("unknown species '{}'", name))
}

fn build_battle(args: &Args) -> Result<BattleState, BattleEngineError> {
    let config = match &args.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default(),
    };

    let p1_monster = MonsterInst::new(args.p1, args.level, None)?;
    let p2_monster = MonsterInst::new(args.p2, args.level, None)?;
    let player1 = BattlePlayer::new("p1".to_string(), "Player 1".to_string(), vec![p1_monster]);

    let state = if args.wild {
        BattleState::new_wild("cli_battle".to_string(), player1, p2_monster)
    } else {
        let player2 = BattlePlayer::new("p2".to_string(), "Player 2".to_string(), vec![p2_monster]);
        BattleState::new("cli_battle".to_string(), player1, player2)
    };
    Ok(state.with_config(config)?)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.describe {
        println!("{}\n\n{}", SpeciesSummary(args.p1), SpeciesSummary(args.p2));
        return ExitCode::SUCCESS;
    }

    let state = match build_battle(&args) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Could not set up the battle: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("Running battle with seed {}", seed);

    let mut system = BattleSystem::new(
        state,
        [
            Box::new(ScoringAI::new(seed.wrapping_add(1))),
            Box::new(ScoringAI::new(seed.wrapping_add(2))),
        ],
        TurnRng::from_seed(seed),
    )
    .with_turn_limit(args.max_turns);

    let result = system.run_to_completion();
    let (final_state, events) = system.into_parts();

    if args.json {
        match serde_json::to_string_pretty(&events) {
            Ok(json) => println!("{}", json),
            Err(err) => eprintln!("Could not serialize the event log: {}", err),
        }
    } else {
        let mut bus = EventBus::new();
        for event in events {
            bus.push(event);
        }
        for line in bus.formatted_lines(&final_state) {
            println!("{}", line);
        }
    }

    match result {
        Ok(outcome) => {
            println!();
            match outcome.winner {
                Some(winner) => println!(
                    "{} wins after {} turns ({:?})",
                    final_state.players[winner].player_name, outcome.turns, outcome.final_state
                ),
                None => println!("No winner after {} turns ({:?})", outcome.turns, outcome.final_state),
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Battle did not finish: {}", err);
            ExitCode::FAILURE
        }
    }
}
