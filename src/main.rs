use std::{
    thread,
    time::{Duration, Instant},
};

mod console;
mod options;
mod stats;

use lifegrid::{Grid, GridCodec, PendingStep, Result, RunLengthEncoded, SimConfig, Simulation};
use stats::SimpleRecord;

/// How long the console waits for input while no step is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

fn args_to_grid(args: &options::Args, config: &SimConfig) -> Result<Grid> {
    if let Some(pattern) = args.pattern() {
        let size = config.grid_size();
        return RunLengthEncoded::default().decode_centered(&pattern, size, size);
    }
    args.fill_mode()?.create_grid(config)
}

fn reached_limit(sim: &Simulation, limit: Option<u64>) -> bool {
    limit.is_some_and(|max| sim.generation() >= max)
}

/// Runs the step chain without a UI until the generation limit, if any
///
/// `wait` is handed the time left until each step is due.
fn run_headless<W: FnMut(Duration)>(sim: &mut Simulation, limit: Option<u64>, mut wait: W) {
    let mut stats = SimpleRecord::new(sim.grid().alive_count());
    let mut pending = if reached_limit(sim, limit) {
        None
    } else {
        sim.start(Instant::now())
    };

    while let Some(step) = pending {
        wait(step.due().saturating_duration_since(Instant::now()));
        pending = sim.fire(step, Instant::now());

        stats.record(sim.generation(), sim.grid().alive_count());
        if stats.has_report() {
            log::info!("{}", stats.report());
        }
        if reached_limit(sim, limit) {
            sim.stop();
            break;
        }
    }
    log::info!(
        "finished at generation {} with {} alive",
        sim.generation(),
        sim.grid().alive_count()
    );
    log::debug!(
        "final board:\n{}",
        RunLengthEncoded::default()
            .set_name(format!("generation {}", sim.generation()))
            .encode(sim.grid())
    );
}

fn run_console(sim: &mut Simulation, limit: Option<u64>) -> Result<()> {
    let mut console = console::ConsoleRender::new()?;
    let mut stats = SimpleRecord::new(sim.grid().alive_count());
    let mut pending: Option<PendingStep> = None;

    loop {
        console.render(sim)?;

        let timeout = pending
            .map(|step| step.due().saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        match console.poll_events(sim, timeout)? {
            Some(console::ConsoleCommand::Exit) => break,
            Some(console::ConsoleCommand::Schedule(step)) => pending = Some(step),
            Some(console::ConsoleCommand::Handled) | None => {}
        }

        // a stop since scheduling makes the pending step a no-op that ends the chain
        let now = Instant::now();
        if let Some(step) = pending.filter(|step| step.is_due(now)) {
            pending = sim.fire(step, now);
            stats.record(sim.generation(), sim.grid().alive_count());
            if reached_limit(sim, limit) {
                sim.stop();
            }
        }

        if stats.has_report() {
            console.set_report(stats.report());
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let config = args.config()?;
    let grid = args_to_grid(&args, &config)?;
    log::debug!("starting with {} alive", grid.alive_count());

    let mut sim = Simulation::new(config)?;
    sim.load(grid)?;
    sim.set_parallel(args.multithreading());

    let limit = args.generations()?;
    if args.headless() {
        run_headless(&mut sim, limit, thread::sleep);
        Ok(())
    } else {
        run_console(&mut sim, limit)
    }
}
