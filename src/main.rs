use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huestrip::models::{FailurePolicy, RunConfig};
use huestrip::rendering::save_png;
use huestrip::services::fetch::decode_page;
use huestrip::services::{Pipeline, TapasClient};

#[derive(Parser)]
#[command(name = "huestrip")]
#[command(about = "Builds a color map of a webcomic, one dominant-color bar per page")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a comic and write the assembled color map
    Scan(ScanArgs),
    /// Extract the dominant colors of a single local image
    Page {
        /// Input image file
        input: PathBuf,

        /// Write the colors as a one-bar PNG instead of printing only
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dominant colors to extract
        #[arg(short, long, default_value_t = 3)]
        num_colors: usize,

        /// Fixed random seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Scan flags; every one overrides the corresponding config-file value.
#[derive(Args)]
struct ScanArgs {
    /// Episode id of the comic's first page
    #[arg(short, long)]
    initial_id: Option<String>,

    /// Config file path (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dominant colors per page
    #[arg(short, long)]
    num_colors: Option<usize>,

    /// Width of each color column in pixels
    #[arg(long)]
    col_width: Option<usize>,

    /// Bar thickness in pixel rows
    #[arg(long)]
    bar_thickness: Option<usize>,

    /// Worker pool size for parallel stages
    #[arg(short, long)]
    workers: Option<usize>,

    /// Extra cluster count above num-colors
    #[arg(long)]
    tweak: Option<usize>,

    /// Comma-separated hex colors to mask before clustering
    #[arg(long, value_delimiter = ',')]
    blacklist: Option<Vec<String>>,

    /// What to do when a page fails
    #[arg(long, value_enum)]
    on_error: Option<FailurePolicy>,

    /// Fixed random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scan(args)) => run_scan_command(args),
        Some(Commands::Page {
            input,
            output,
            num_colors,
            seed,
        }) => run_page_command(&input, output, num_colors, seed),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Scan a comic end to end and write the color map.
fn run_scan_command(args: ScanArgs) -> anyhow::Result<()> {
    init_logging("huestrip=info");

    let mut config = RunConfig::load(
        args.config
            .as_deref()
            .unwrap_or_else(|| std::path::Path::new("huestrip.yaml")),
    );

    // CLI flags override file values.
    if args.initial_id.is_some() {
        config.initial_id = args.initial_id;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(num_colors) = args.num_colors {
        config.num_colors = num_colors;
    }
    if let Some(col_width) = args.col_width {
        config.col_width = col_width;
    }
    if let Some(bar_thickness) = args.bar_thickness {
        config.bar_thickness = bar_thickness;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(tweak) = args.tweak {
        config.tweak = tweak;
    }
    if let Some(blacklist) = args.blacklist {
        config.blacklist = blacklist;
    }
    if let Some(on_error) = args.on_error {
        config.on_error = on_error;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let Some(initial_id) = config.initial_id.clone() else {
        anyhow::bail!("no comic to scan: pass --initial-id or set initial_id in the config file");
    };

    let provider = TapasClient::new(initial_id)?;
    let pipeline = Pipeline::from_config(&config)?;
    let grid = pipeline.run(&provider)?;

    save_png(&grid, &config.output)?;
    println!(
        "Wrote {} ({} pages, {}x{})",
        config.output.display(),
        grid.bar_count(),
        grid.width(),
        grid.height()
    );
    Ok(())
}

/// Extract dominant colors from one local image (no network needed).
fn run_page_command(
    input: &std::path::Path,
    output: Option<PathBuf>,
    num_colors: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    use dominant_color::{render_bar, BarLayout, ColorBlacklist, ColorExtractor, OutputGrid};

    init_logging("huestrip=warn");

    let config = RunConfig::default();
    let bytes = std::fs::read(input)?;
    let Some(pixels) = decode_page(&bytes) else {
        anyhow::bail!("{} is not a decodable color image", input.display());
    };

    let mut extractor = ColorExtractor::new(num_colors)
        .tweak(config.tweak)
        .blacklist(ColorBlacklist::new(&config.blacklist_colors()?));
    if let Some(seed) = seed {
        extractor = extractor.seed(seed);
    }

    let colors = extractor.extract(&pixels)?;
    for color in &colors {
        println!("{color}");
    }

    if let Some(output) = output {
        let layout = BarLayout::new(num_colors, config.col_width, config.bar_thickness);
        let mut grid = OutputGrid::new(layout.output_width());
        grid.push_bar(render_bar(&colors, &layout)?)?;
        save_png(&grid, &output)?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}

/// Show defaults and config discovery when run without a subcommand.
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let defaults = RunConfig::default();
    let config_present = std::path::Path::new("huestrip.yaml").exists();

    println!("Huestrip v{VERSION} - comic color maps");
    println!("One dominant-color bar per page, stacked in reading order\n");

    println!("Config:");
    println!(
        "  huestrip.yaml = {}",
        if config_present {
            "found in current directory"
        } else {
            "(not found, defaults apply)"
        }
    );

    println!("\nDefaults:");
    println!("  num_colors    = {}", defaults.num_colors);
    println!("  col_width     = {}", defaults.col_width);
    println!("  bar_thickness = {}", defaults.bar_thickness);
    println!("  workers       = {}", defaults.workers);
    println!("  tweak         = {}", defaults.tweak);
    println!("  blacklist     = {}", defaults.blacklist.join(", "));
    println!("  output        = {}", defaults.output.display());

    println!("\nRun `huestrip scan --initial-id <id>` to build a color map,");
    println!("or `huestrip page <image>` to inspect a single page.");
}
