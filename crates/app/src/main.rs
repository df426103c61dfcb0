use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sort_visualiser_core::{
    Algorithm, AppConfig, LaneId, PlayReport, RenderLog, Renderer, Session,
};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{Board, TerminalRenderer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> sort_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => {
            for algorithm in Algorithm::ALL {
                println!("{algorithm}");
            }
            Ok(())
        }
        Commands::Play(args) => run_play(args).await,
    }
}

async fn run_play(args: PlayArgs) -> sort_visualiser_core::Result<()> {
    let config = args.resolve_config()?;
    tracing::info!(
        algorithm = %args.algorithm,
        against = ?args.against,
        size = config.array.size,
        speed = config.playback.speed,
        "starting playback"
    );

    if args.headless {
        let session = Session::new(config, RenderLog::new(), RenderLog::new())?;
        let report = play(session, &args).await?;
        log_report(&report);
    } else {
        let board = Board::shared();
        let session = Session::new(
            config,
            TerminalRenderer::new(board.clone(), 0),
            TerminalRenderer::new(board, 1),
        )?;
        let report = play(session, &args).await?;
        log_report(&report);
    }
    Ok(())
}

async fn play<R: Renderer>(mut session: Session<R>, args: &PlayArgs) -> sort_visualiser_core::Result<PlayReport> {
    session.select_algorithm(LaneId::First, &args.algorithm)?;
    if let Some(against) = &args.against {
        session.select_algorithm(LaneId::Second, against)?;
        session.toggle_dual()?;
    }
    session.play().await
}

fn log_report(report: &PlayReport) {
    for run in std::iter::once(&report.first).chain(report.second.as_ref()) {
        tracing::info!(
            algorithm = %run.algorithm,
            len = run.len,
            events = run.events,
            elapsed = ?run.elapsed,
            "lane finished"
        );
    }
}

/// Logs go to stderr so they stay off the board. `SORT_VIZ_LOG` wins over
/// `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("SORT_VIZ_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn,sort_visualiser=info,sort_visualiser_core=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated sorting algorithm visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate one algorithm, or two side by side.
    Play(PlayArgs),
    /// Print the available algorithm names.
    List,
}

#[derive(clap::Args, Debug)]
struct PlayArgs {
    /// Algorithm for the first lane, e.g. "quick sort".
    algorithm: String,
    /// Algorithm for a second lane sorting the same starting values.
    #[arg(short, long)]
    against: Option<String>,
    /// JSON configuration file; flags below override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of bars.
    #[arg(long)]
    size: Option<usize>,
    /// Smallest generated value.
    #[arg(long)]
    low: Option<i64>,
    /// Largest generated value.
    #[arg(long)]
    high: Option<i64>,
    /// Playback speed; pacing is 800ms divided by this.
    #[arg(long)]
    speed: Option<f64>,
    /// Seed for reproducible values and pivots.
    #[arg(long)]
    seed: Option<u64>,
    /// Run without drawing.
    #[arg(long)]
    headless: bool,
}

impl PlayArgs {
    fn resolve_config(&self) -> sort_visualiser_core::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(size) = self.size {
            config.array.size = size;
        }
        if let Some(low) = self.low {
            config.array.low_bound = low;
        }
        if let Some(high) = self.high {
            config.array.high_bound = high;
        }
        if let Some(speed) = self.speed {
            config.playback.speed = speed;
        }
        if self.seed.is_some() {
            config.playback.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}
