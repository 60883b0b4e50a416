//! sim-runner: headless simulation runner for Glupper.
//!
//! Usage:
//!   sim-runner --seed 12345 --ticks 8760 --tick-size 1
//!   sim-runner --seed 12345 --config balance.json --ipc-mode

use anyhow::Result;
use glupper_core::{
    clock::TickSize,
    config::SimConfig,
    engine::{SimEngine, TickSummary},
    event::SimEvent,
    snapshot::SimSnapshot,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Step {
        #[serde(default = "one")]
        count: u64,
    },
    Action {
        name: String,
    },
    Quit,
}

fn one() -> u64 { 1 }

#[derive(serde::Serialize)]
struct IpcReply<'a> {
    state: SimSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_tick: Option<&'a TickSummary>,
    /// Events raised since the previous reply.
    events: Vec<SimEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let ticks = parse_arg(&args, "--ticks", 24u64 * 365);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config_path = args
        .windows(2)
        .find(|w| w[0] == "--config")
        .map(|w| w[1].as_str());

    let mut config = match config_path {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(hours) = args
        .windows(2)
        .find(|w| w[0] == "--tick-size")
        .and_then(|w| w[1].parse::<u64>().ok())
    {
        config.initial.tick_size = TickSize::from_hours(hours)?;
    }

    if !ipc_mode {
        println!("Glupper — sim-runner");
        println!("  seed:      {seed}");
        println!("  ticks:     {ticks}");
        println!("  tick size: {}h", config.initial.tick_size.hours());
        println!("  config:    {}", config_path.unwrap_or("(defaults)"));
        println!();
    }

    let mut engine = SimEngine::new(config, seed);

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        let summaries = engine.run_ticks(ticks);
        print_summary(&engine, &summaries);
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
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => write_state(&mut stdout, engine, None)?,
            IpcCommand::Step { count } => {
                let summaries = engine.run_ticks(count);
                write_state(&mut stdout, engine, summaries.last())?;
            }
            IpcCommand::Action { name } => match engine.apply_named(&name) {
                Ok(_) => write_state(&mut stdout, engine, None)?,
                Err(e) => {
                    log::warn!("Rejected command {name}: {e}");
                    write_error(&mut stdout, &e.to_string())?;
                }
            },
        }
    }
    Ok(())
}

fn write_state(out: &mut impl Write, engine: &mut SimEngine, last_tick: Option<&TickSummary>) -> Result<()> {
    let state = SimSnapshot::capture(engine);
    let reply = IpcReply { state, last_tick, events: engine.drain_events() };
    writeln!(out, "{}", serde_json::to_string(&reply)?)?;
    out.flush()?;
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{err_json}")?;
    out.flush()?;
    Ok(())
}

fn print_summary(engine: &SimEngine, summaries: &[TickSummary]) {
    let snapshot = SimSnapshot::capture(engine);
    let organic: u64 = summaries.iter().map(|s| s.organic_growth.sample).sum();
    let churned: u64 = summaries.iter().map(|s| s.churn.sample).sum();
    let ad_revenue: f64 = summaries.iter().map(|s| s.ad_revenue).sum();
    let down_ticks = summaries.iter().filter(|s| s.is_down).count();

    println!("=== RUN SUMMARY ===");
    println!("  seed:           {}", engine.seed());
    println!("  ticks run:      {}", summaries.len());
    println!("  final tick:     {} (day {}, hour {})", snapshot.tick, snapshot.day, snapshot.hour);
    println!("  users:          {:.0}", snapshot.users);
    println!("  organic growth: {organic}");
    println!("  churned:        {churned}");
    println!("  ticks down:     {down_ticks}");
    println!("  sentiment:      {:.0}", snapshot.sentiment);

    println!();
    println!("=== FINANCIAL SUMMARY ===");
    println!("  money:          ${:.2}", snapshot.money);
    println!("  ad revenue:     ${ad_revenue:.2}");
    println!("  ownership:      {:.2}%", snapshot.ownership * 100.0);
    println!("  loans:          {} outstanding", snapshot.outstanding_loans.len());
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
