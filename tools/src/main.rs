//! startup-runner: headless runner for the startup simulation.
//!
//! Usage:
//!   startup-runner --months 24 --db run.db
//!   startup-runner --seed 12345 --founder 5,5,5 --ipc-mode
//!
//! Without --seed the game is unseeded; the drawn seed is printed so the
//! run can be replayed.

use anyhow::Result;
use startup_sim_core::{
    command::PlayerCommand,
    config::SimConfig,
    engine::{PendingInteraction, SimEngine},
    event::money,
    rng::RngBank,
    snapshot::FinalSnapshot,
    state::{Attributes, GameState, MemberRole},
    store::SessionStore,
    team::FounderProfile,
    transactions::AssetKind,
    types::Money,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: PlayerCommand },
    TakeFinalState,
    Quit,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UiState<'a> {
    state:         &'a GameState,
    burn_rate:     Money,
    pending:       Option<PendingInteraction>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed: Option<u64> = flag_value(&args, "--seed").and_then(|raw| raw.parse().ok());
    let months = parse_arg(&args, "--months", 24u32);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = flag_value(&args, "--data-dir").unwrap_or("./data");

    let config = SimConfig::load(data_dir)?;
    let founder = match flag_value(&args, "--founder") {
        Some(raw) => parse_founder(raw)?,
        None => FounderProfile::balanced(config.start.founder_points),
    };

    let rng_bank = match seed {
        Some(seed) => RngBank::new(seed),
        None => RngBank::from_entropy(),
    };

    if !ipc_mode {
        println!("Startup Simulator: startup-runner");
        println!(
            "  seed:      {}{}",
            rng_bank.master_seed(),
            if seed.is_some() { "" } else { " (entropy)" }
        );
        println!("  months:    {months}");
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!("  events:    {}", if config.external_events.enabled { "remote" } else { "local" });
        println!();
    }

    let store = if db == ":memory:" {
        SessionStore::in_memory()?
    } else {
        SessionStore::open(db)?
    };
    store.migrate()?;

    let mut engine = SimEngine::new(config, founder, rng_bank)?.with_store(store);

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        run_autopilot(&mut engine, months)?;
        print_summary(&engine)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut SimEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&ui_state(engine, None))?)?;
            }
            IpcCommand::Command { command } => {
                let pending = match engine.apply(command) {
                    Ok(pending) => pending,
                    Err(e) => {
                        writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                        stdout.flush()?;
                        continue;
                    }
                };
                writeln!(stdout, "{}", serde_json::to_string(&ui_state(engine, pending))?)?;
            }
            IpcCommand::TakeFinalState => {
                let snapshot: Option<FinalSnapshot> = match engine.store() {
                    Some(store) => store.take_final_state()?,
                    None => None,
                };
                writeln!(stdout, "{}", serde_json::to_string(&snapshot)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn ui_state(engine: &SimEngine, pending: Option<PendingInteraction>) -> UiState<'_> {
    UiState {
        state: engine.state(),
        burn_rate: engine.burn_rate(),
        pending,
    }
}

/// A simple scripted player: start ads, hire or upgrade infra while
/// runway allows, and take any offer worth at least 2.5× valuation.
fn run_autopilot(engine: &mut SimEngine, months: u32) -> Result<()> {
    engine.toggle_recurring_action("paid_ads");
    let hiring_order = [MemberRole::Engineer, MemberRole::Marketer, MemberRole::Designer];
    let mut next_hire = 0usize;

    for _ in 0..months {
        if engine.state().game_over {
            break;
        }

        let role = hiring_order[next_hire % hiring_order.len()];
        let fee = engine.config.hiring_costs.for_role(role).unwrap_or(0.0);
        let runway_floor = engine.burn_rate() * 6.0;
        if engine.state().cash - fee > runway_floor {
            engine.hire(role);
            next_hire += 1;
        } else if let Some(price) =
            engine.config.asset_prices.infra_upgrade(engine.state().assets.infra_level)
        {
            if engine.state().cash - price > runway_floor {
                engine.buy_asset(AssetKind::Infra);
            }
        }

        let outcome = engine.advance_month()?;
        match outcome.pending {
            Some(PendingInteraction::Event { card, impact }) => {
                log::info!("month={} event '{}': {}", outcome.state.month, card.title, impact.summary());
            }
            Some(PendingInteraction::AcquisitionOffer { offer, .. }) => {
                let accept = offer.amount >= offer.valuation * 2.5;
                log::info!(
                    "month={} offer {} against valuation {} accepted={accept}",
                    outcome.state.month,
                    money(offer.amount),
                    money(offer.valuation)
                );
                engine.respond_to_offer(accept);
            }
            None => {}
        }
    }
    Ok(())
}

fn print_summary(engine: &SimEngine) -> Result<()> {
    let state = engine.state().clone();

    println!("=== RUN SUMMARY ===");
    println!("  final month:    {}", state.month);
    println!("  cash:           {}", money(state.cash));
    println!("  users:          {}", state.users);
    println!("  valuation:      {}", money(state.valuation));
    println!("  burn rate:      {}", money(engine.burn_rate()));
    println!("  headcount:      {}", state.team.headcount());
    println!("  infra level:    {}", state.assets.infra_level);
    println!("  patents:        {}", state.assets.patents);
    println!("  game over:      {}", state.game_over);

    if let Some(store) = engine.store() {
        if let Some(snapshot) = store.take_final_state()? {
            println!();
            println!("=== FINAL STATE ===");
            println!("  outcome:        {:?}", snapshot.outcome);
            println!("  saved at:       {}", snapshot.saved_at);
        }
    }

    println!();
    println!("=== LAST EVENTS ===");
    for entry in state.events.iter().rev().take(8).collect::<Vec<_>>().into_iter().rev() {
        println!("  [{:>3}] {:?}: {}", entry.month, entry.kind, entry.message);
    }
    Ok(())
}

fn parse_founder(raw: &str) -> Result<FounderProfile> {
    let parts: Vec<u8> = raw
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|e| anyhow::anyhow!("--founder expects coding,design,marketing: {e}"))?;
    let &[coding, design, marketing] = parts.as_slice() else {
        anyhow::bail!("--founder expects exactly three values, got {}", parts.len());
    };
    Ok(FounderProfile { attributes: Attributes { coding, design, marketing } })
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
