//! Rebound simulation runner.
//!
//! `rebound run` drives the authoritative simulation and broadcasts every
//! ball after every tick. `rebound observe` reads those frames from stdin and
//! mirrors them into a local replica, so the two can be piped together:
//!
//! ```text
//! rebound run | rebound observe
//! ```

mod canvas;
mod frame_stats;
mod observe;
mod spawn;

use clap::{Parser, Subcommand};
use crossbeam_channel::Receiver;
use log::{debug, error, info, Level};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rebound_config::{parse_config, validate, Config, ConfigError, ConfigOverrides, SenderConfig, SenderType, SerializerType};
use rebound_core::{ArenaBounds, StopWatch, TimeRecorder, World, WorldError};
use rebound_transport::{
    BinarySerializer, FileSender, JsonSerializer, NetworkBroadcaster, NullSender, Sender, Serializer, StdioSender,
    TransportError,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "websocket")]
use rebound_transport::WebSocketSender;

use crate::canvas::LogCanvas;
use crate::frame_stats::FrameStats;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bouncing-ball simulation with per-tick state broadcast", long_about = None)]
struct Args {
    /// Path to the simulation configuration file (JSON or TOML)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the authoritative simulation (default)
    Run,
    /// Mirror frames read from stdin into a local replica
    Observe,
}

#[derive(Error, Debug)]
enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("Failed to set up frame statistics: {0}")]
    Stats(#[from] hdrhistogram::CreationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(not(feature = "websocket"))]
    #[error("The {0} sender is not available in this build")]
    Unsupported(&'static str),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RunnerError> {
    let mut config = parse_config(&args.config)?;
    config.apply_overrides(&args.overrides);
    validate(&config)?;
    info!("Using configuration from {}", args.config.display());

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run_simulation(&config, args.frames),
        Command::Observe => run_observer(&config, args.frames),
    }
}

fn run_simulation(config: &Config, frame_limit: Option<u64>) -> Result<(), RunnerError> {
    let arena = ArenaBounds::new(config.arena.width, config.arena.height);
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut world = World::new();
    let spawned = spawn::populate(&mut world, config, &arena, &mut rng)?;
    info!("Spawned {} balls in a {}x{} arena", spawned, arena.width, arena.height);

    let mut broadcaster = NetworkBroadcaster::new(
        create_serializer(config.transport.serializer),
        create_sender(&config.transport.sender)?,
    );
    let shutdown = install_shutdown_handler()?;

    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(config.framerate));
    let mut frame_times = TimeRecorder::new();
    let mut stats = FrameStats::new()?;
    let mut canvas = LogCanvas::default();
    let mut clock = StopWatch::start();

    info!(
        "Running simulation at {} FPS, broadcasting {} frames via {:?}",
        config.framerate,
        broadcaster.serializer().name(),
        config.transport.sender.sender_type
    );

    loop {
        if shutdown.try_recv().is_ok() {
            info!("Shutdown requested");
            break;
        }
        if frame_limit.map_or(false, |limit| world.frame() >= limit) {
            break;
        }

        let delta_ms = u32::try_from(clock.lap().as_millis()).unwrap_or(u32::MAX);
        {
            let _frame = StopWatch::recording(&mut frame_times);
            world.tick(delta_ms, &arena, &mut broadcaster);
            world.draw(&mut canvas);
        }

        let mut work = Duration::ZERO;
        for lap in frame_times.take_recordings() {
            stats.record(lap);
            work += lap;
        }

        if work < frame_budget {
            spin_sleep::sleep(frame_budget - work);
        } else if config.framerate > 10 {
            // Only worth mentioning when the target framerate is high enough to matter
            debug!("Frame time exceeded budget: {:?} > {:?}", work, frame_budget);
        }
    }

    broadcaster.flush()?;
    let sent = broadcaster.stats();
    info!(
        "Simulated {} frames over {:?}; broadcast {} actions ({} failed)",
        world.frame(),
        clock.total_lifetime(),
        sent.sent,
        sent.failed
    );
    stats.log_summary();
    Ok(())
}

fn run_observer(config: &Config, frame_limit: Option<u64>) -> Result<(), RunnerError> {
    let serializer = create_serializer(config.transport.serializer);
    let mut world = World::new();
    info!("Observing {} frames on stdin", serializer.name());

    let stdin = std::io::stdin();
    let summary = observe::observe_frames(stdin.lock(), serializer.as_ref(), &mut world, frame_limit)?;

    info!(
        "Applied {} frames ({} malformed), replica holds {} balls",
        summary.applied, summary.malformed, world.len()
    );
    world.draw(&mut LogCanvas::new(Level::Info));
    Ok(())
}

fn create_serializer(serializer_type: SerializerType) -> Box<dyn Serializer> {
    match serializer_type {
        SerializerType::Json => Box::new(JsonSerializer),
        SerializerType::Binary => Box::new(BinarySerializer),
    }
}

fn create_sender(config: &SenderConfig) -> Result<Box<dyn Sender>, RunnerError> {
    match config.sender_type {
        SenderType::Stdio => Ok(Box::new(StdioSender::new())),
        SenderType::File => Ok(Box::new(FileSender::new(config.file_options().path)?)),
        SenderType::Null => Ok(Box::new(NullSender)),
        SenderType::WebSocket => create_websocket_sender(config),
    }
}

#[cfg(feature = "websocket")]
fn create_websocket_sender(config: &SenderConfig) -> Result<Box<dyn Sender>, RunnerError> {
    let options = config.websocket_options();
    let mut sender = WebSocketSender::new(&options.address());
    sender.start()?;
    Ok(Box::new(sender))
}

#[cfg(not(feature = "websocket"))]
fn create_websocket_sender(_config: &SenderConfig) -> Result<Box<dyn Sender>, RunnerError> {
    Err(RunnerError::Unsupported("websocket"))
}

fn install_shutdown_handler() -> Result<Receiver<()>, ctrlc::Error> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })?;
    Ok(rx)
}
