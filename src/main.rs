use clap::{Parser, Subcommand};
use imgcr::config::{self, Overrides, RunConfig};
use imgcr::imaging::Quality;
use imgcr::prompt::Prompter;
use imgcr::{output, process};
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "imgcr")]
#[command(version)]
#[command(about = "Batch compress and downscale PNG/JPG images to JPEG")]
#[command(long_about = "\
Batch compress and downscale PNG/JPG images to JPEG

Every .png and .jpg file directly inside SOURCE is re-encoded as JPEG at the
chosen quality. Images wider than the max width are downscaled to exactly
that width, keeping their aspect ratio. Results are written to a folder
inside SOURCE, keeping each file's original name:

  photos/
  ├── beach.png                        # 8000x4000 source
  ├── portrait.JPG
  └── CompressedAndResizedImages/
      ├── beach.png                    # 2000x1000, JPEG bytes
      └── portrait.JPG

Run without SOURCE to be asked for the source, quality and max width.
Run 'imgcr gen-config' to generate a documented config file.")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Directory containing the images (`.` for the current directory)
    #[arg(env = "IMGCR_SOURCE")]
    source: Option<String>,

    /// JPEG quality, 0-100
    #[arg(short, long, env = "IMGCR_QUALITY", value_parser = config::parse_quality)]
    quality: Option<Quality>,

    /// Images wider than this are downscaled to this width
    #[arg(short = 'w', long, env = "IMGCR_MAX_WIDTH", value_parser = config::parse_max_width)]
    max_width: Option<u32>,

    /// Config file with output and batch settings
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Skip images that fail instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,

    /// Write outputs with a .jpg extension instead of the original one
    #[arg(long)]
    jpg_extension: bool,

    /// Log every decode, resize and encode step
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    init_logging(cli.verbose);

    let overlay = cli
        .config
        .as_deref()
        .map(config::load_raw_config)
        .transpose()?;
    let overrides = Overrides {
        quality: cli.quality,
        max_width: cli.max_width,
        keep_going: cli.keep_going,
        jpg_extension: cli.jpg_extension,
    };
    let needs = overrides.prompt_needs(overlay.as_ref());
    let mut settings = config::layered_settings(overlay, &overrides)?;

    let cwd = std::env::current_dir()?;
    let source_dir = match cli.source {
        Some(source) => config::resolve_source_dir(&source, &cwd)?,
        None => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            let answers = prompter.collect(&cwd, needs.quality, needs.max_width)?;
            answers.apply(&mut settings);
            answers.source_dir
        }
    };

    let run = RunConfig::new(source_dir, &settings)?;
    output::print_run_header(&run);
    println!();

    let report = process::run(&run)?;
    output::print_report(&report);

    if !report.is_success() {
        return Err(format!("{} image(s) failed", report.failed_count()).into());
    }
    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let env_filter = if verbose { "imgcr=debug" } else { "imgcr=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
