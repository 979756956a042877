use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use log::info;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use himawall::desktop::battery;
use himawall::{run, Error, GridConfig, Level, RunConfig};

/// Set a near-realtime picture of Earth as your desktop background.
#[derive(Parser, Debug)]
#[command(name = "himawall", version, about)]
struct Cli {
    /// Determine the UTC offset automatically from the local clock
    #[arg(long, conflicts_with = "offset")]
    auto_offset: bool,

    /// UTC time offset in hours, between -12 and +10
    #[arg(short, long, default_value_t = 10)]
    offset: i32,

    /// Quality (and size) of the tiled download; one of 4, 8, 16, 20
    #[arg(short, long, default_value_t = 4)]
    level: u32,

    /// Download the image as a level×level tile grid instead of the
    /// archive's single-file link
    #[arg(long)]
    tiles: bool,

    /// Deadline in minutes for the whole pipeline, 0 to disable
    #[arg(short, long, default_value_t = 6)]
    deadline: u64,

    /// Stop refreshing while running on battery
    #[arg(long)]
    save_battery: bool,

    /// Directory to save the background image
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Image to composite the background image over
    #[arg(long)]
    composite_over: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run_cli(Cli::parse()).await {
        eprintln!("{err}");
        process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> himawall::Result<()> {
    let config = RunConfig {
        auto_offset: cli.auto_offset,
        offset: cli.offset,
        level: Level::new(cli.level)?,
        tiles: cli.tiles,
        output_dir: cli.output_dir.unwrap_or_else(RunConfig::default_output_dir),
        composite_over: cli.composite_over,
        grid: GridConfig::default(),
    };
    config.validate()?;

    if cli.save_battery && battery::is_discharging()? {
        return Err(Error::Validation(String::from(
            "discharging, not refreshing",
        )));
    }

    let cancel = CancellationToken::new();
    let path = if cli.deadline == 0 {
        run(&config, cancel).await?
    } else {
        match timeout(
            Duration::from_secs(cli.deadline * 60),
            run(&config, cancel.clone()),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                // cooperative deadline: in-flight fetches observe the token
                // between retries and give up
                cancel.cancel();
                return Err(Error::Timeout(cli.deadline));
            }
        }
    };

    info!("background set from '{}'", path.display());
    Ok(())
}
