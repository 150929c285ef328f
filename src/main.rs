/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{error, info, warn};
use std::io::{self, BufRead};
use std::sync::Arc;
use std::time::Duration;

/* Custom libraries */
use dispatcher::Dispatcher;
use lift::{spawn_lift, Lift};
use shared::{SharedRng, TieBreaker};

/* Modules */
mod config;
mod dispatcher;
mod lift;
mod shared;

const PROMPT: &str = "Enter a floor number, S for status, C to cancel";

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("lift_sim")
        .about("Simulates a bank of lifts servicing floor calls")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the TOML configuration file"),
        )
        .arg(
            Arg::new("floors")
                .long("floors")
                .takes_value(true)
                .help("Highest floor number, overrides the config file"),
        )
        .arg(
            Arg::new("lifts")
                .long("lifts")
                .takes_value(true)
                .help("Number of lifts, overrides the config file"),
        )
        .arg(
            Arg::new("tick-ms")
                .long("tick-ms")
                .takes_value(true)
                .help("Milliseconds per floor move, overrides the config file"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for the direction tie-break generator"),
        )
        .get_matches();

    // Load the configuration and apply command line overrides
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let mut config = unwrap_or_exit!(config::load_config(config_path));
    if let Some(floors) = unwrap_or_exit!(matches.value_of("floors").map(str::parse::<i32>).transpose()) {
        config.simulation.n_floors = floors;
    }
    if let Some(lifts) = unwrap_or_exit!(matches.value_of("lifts").map(str::parse::<usize>).transpose()) {
        config.simulation.n_lifts = lifts;
    }
    if let Some(tick_ms) = unwrap_or_exit!(matches.value_of("tick-ms").map(str::parse::<u64>).transpose()) {
        config.simulation.tick_ms = tick_ms;
    }
    if let Some(seed) = unwrap_or_exit!(matches.value_of("seed").map(str::parse::<u64>).transpose()) {
        config.simulation.seed = Some(seed);
    }
    unwrap_or_exit!(config.validate());
    let sim = config.simulation;

    // One generator shared by every lift
    let tie_breaker: Arc<dyn TieBreaker> = match sim.seed {
        Some(seed) => Arc::new(SharedRng::from_seed(seed)),
        None => Arc::new(SharedRng::from_entropy()),
    };

    // Initialise lifts
    let tick = Duration::from_millis(sim.tick_ms);
    let lifts: Vec<Arc<Lift>> = (0..sim.n_lifts)
        .map(|_| Arc::new(Lift::new(sim.n_floors, tie_breaker.clone()).with_tick(tick)))
        .collect();

    // Dropping the sender stops every lift
    let (cancel_tx, cancel_rx) = cbc::unbounded::<()>();
    let mut lift_threads = Vec::with_capacity(sim.n_lifts);
    for (i, lift) in lifts.iter().enumerate() {
        let handle = unwrap_or_exit!(spawn_lift(lift.clone(), format!("lift_{}", i), cancel_rx.clone()));
        lift_threads.push(handle);
    }
    drop(cancel_rx);

    // Initialise dispatcher
    let dispatcher = Dispatcher::new(lifts, sim.n_floors);
    info!(
        "Started {} lifts serving floors 0 to {}",
        dispatcher.lifts().len(),
        dispatcher.max_floor()
    );

    println!("{}", PROMPT);
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        };

        match line.trim() {
            "C" => break,
            "S" => print_statuses(&dispatcher),
            input => {
                if let Ok(floor) = input.parse::<i32>() {
                    if let Err(e) = dispatcher.summon(floor) {
                        println!("{}", e);
                    }
                }
            }
        }
        println!("{}", PROMPT);
    }

    // Shut down and wait for every lift to finish its current move
    drop(cancel_tx);
    for handle in lift_threads {
        if handle.join().is_err() {
            error!("A lift thread panicked");
        }
    }
}

fn print_statuses(dispatcher: &Dispatcher<Lift>) {
    for (i, status) in dispatcher.statuses().iter().enumerate() {
        match serde_json::to_string(status) {
            Ok(json) => println!("lift_{}: {}", i, json),
            Err(e) => warn!("Failed to serialize status of lift_{}: {}", i, e),
        }
    }
}
