use anyhow::Context;
use clap::{Parser, Subcommand};
use cubes_common::{SimConfig, SubmissionMode, ViewConfig};
use cubes_input::NoInput;
use cubes_kernel::ScaleTable;
use cubes_render::{FrameController, FrameLoop, NoopPresenter, RecordingBackend};
use cubes_tools::TracingDiagnostics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubes-cli", about = "Headless runner for the bouncing cubes simulation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Run the frame loop against a recording backend
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// RNG seed for the initial population
        #[arg(short, long)]
        seed: Option<u64>,
        /// Population capacity
        #[arg(short, long)]
        cubes: Option<usize>,
        /// JSON file with a full or partial configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Start in array submission mode
        #[arg(long)]
        draw_arrays: bool,
        /// Start with blending disabled
        #[arg(long)]
        no_blend: bool,
        /// Print the final population as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the per-slot scale table
    Scales {
        /// Population capacity
        #[arg(short, long, default_value = "350")]
        cubes: usize,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

type HeadlessLoop = FrameLoop<RecordingBackend, NoopPresenter, NoInput, TracingDiagnostics>;

/// Run `ticks` frames against a recording backend. Returns the finished loop
/// and the number of frames it ran.
fn run_headless(config: SimConfig, ticks: u64) -> (HeadlessLoop, u64) {
    let controller = FrameController::new(config, ViewConfig::default());
    let mut frame_loop = FrameLoop::new(
        controller,
        RecordingBackend::new(),
        NoopPresenter,
        NoInput,
        TracingDiagnostics::new(),
    );
    let frames = frame_loop.run(Some(ticks));

    let sim = frame_loop.controller().simulation();
    tracing::info!(
        frames,
        tick = sim.tick(),
        cubes = sim.population().len(),
        draws = frame_loop.backend().total_draws(),
        "simulation finished"
    );
    (frame_loop, frames)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let view = ViewConfig::default();
            println!("cubes-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "view: {}x{} fov={} near={} far={}",
                view.width, view.height, view.fov_degrees, view.near, view.far
            );
            println!("default config:");
            println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
        }
        Commands::Simulate {
            ticks,
            seed,
            cubes,
            config,
            draw_arrays,
            no_blend,
            json,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(cubes) = cubes {
                config.capacity = cubes;
            }
            if draw_arrays {
                config.flags.submission = SubmissionMode::Arrays;
            }
            if no_blend {
                config.flags.blending = false;
            }
            config.validate()?;

            println!(
                "Simulating {} cubes: seed={}, ticks={ticks}",
                config.capacity, config.seed
            );

            let (frame_loop, frames) = run_headless(config, ticks);

            let sim = frame_loop.controller().simulation();
            println!("Frames run: {frames}");
            println!(
                "Elapsed: {:.3}  Angle: {:.2}  Zoom: {:.3}",
                sim.elapsed(),
                sim.angle_degrees(),
                sim.zoom_offset()
            );
            println!("Last frame: {}", frame_loop.backend().summary());
            if let Some(fps) = frame_loop.diagnostics().stats().average_fps() {
                println!("Average fps: {fps:.1}");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(sim.population().cubes())?);
            }
        }
        Commands::Scales { cubes } => {
            let defaults = SimConfig::default();
            let table = ScaleTable::new(cubes, defaults.scale_base, defaults.scale_span);
            for (slot, factor) in table.factors().iter().enumerate() {
                println!("{slot:>4}  {factor:.6}");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_run_draws_every_slot_each_frame() {
        let config = SimConfig {
            capacity: 5,
            ..SimConfig::default()
        };
        let (frame_loop, frames) = run_headless(config, 3);

        assert_eq!(frames, 3);
        assert_eq!(frame_loop.controller().simulation().tick(), 3);
        assert_eq!(frame_loop.backend().total_draws(), 15);
        assert_eq!(frame_loop.backend().draws().len(), 5);
        assert_eq!(frame_loop.diagnostics().stats().frames(), 3);
    }

    #[test]
    fn simulate_flags_parse() {
        let cli = Cli::parse_from(["cubes-cli", "simulate", "--ticks", "4", "--cubes", "9", "--no-blend"]);
        match cli.command {
            Commands::Simulate {
                ticks,
                cubes,
                no_blend,
                draw_arrays,
                ..
            } => {
                assert_eq!(ticks, 4);
                assert_eq!(cubes, Some(9));
                assert!(no_blend);
                assert!(!draw_arrays);
            }
            _ => panic!("expected simulate"),
        }
    }
}
