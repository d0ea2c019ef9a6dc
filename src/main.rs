//! Sahab - Word-cloud renderer for sports trend dashboards
//!
//! Turns exported social-media trend statistics (word frequencies or
//! entity mentions, Arabic or otherwise) into non-overlapping word-cloud
//! images, with light and dark palettes and a watch mode that re-renders
//! whenever the data, theme, or canvas size changes.

mod config;
mod core;
mod data;
mod fonts;
mod layout;
mod render;
mod theme;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::core::app::App;
use crate::fonts::LoadedFont;
use crate::layout::{HeuristicMeasure, Measure, PassReport};
use crate::render::{Canvas, CloudPainter};
use crate::theme::Theme;

#[derive(Parser)]
#[command(name = "sahab")]
#[command(author = "Sahab Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Word-cloud renderer for sports trend dashboards", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a word cloud from a trend statistics file
    Render {
        /// Trend statistics JSON (word or entity records)
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "cloud.png")]
        out: PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Color theme (light or dark)
        #[arg(short, long)]
        theme: Option<String>,

        /// Seed for reproducible placement
        #[arg(short, long)]
        seed: Option<u64>,

        /// Font file to use instead of the system lookup
        #[arg(short, long)]
        font: Option<PathBuf>,
    },

    /// Print computed placements as JSON without drawing
    Layout {
        /// Trend statistics JSON (word or entity records)
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Seed for reproducible placement
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Watch the data and config files and re-render on every change
    Watch {
        /// Trend statistics JSON (word or entity records)
        #[arg(short, long, value_name = "FILE")]
        data: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "cloud.png")]
        out: PathBuf,
    },

    /// Initialize Sahab configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sahab")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sahab.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose)?;

    let config_path = cli.config.clone().or_else(|| {
        let default_config = Config::default_path()?;
        if default_config.exists() {
            Some(default_config)
        } else {
            None
        }
    });

    let config = if let Some(path) = &config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Render {
            data,
            out,
            width,
            theme,
            seed,
            font,
        } => cmd_render(config, data, out, width, theme, seed, font),
        Commands::Layout { data, width, seed } => cmd_layout(config, data, width, seed),
        Commands::Watch { data, out } => {
            let mut app = App::new(data, out, config, config_path);
            app.run().await
        }
        Commands::Init { force } => {
            let path = cli
                .config
                .or_else(Config::default_path)
                .context("could not determine a configuration directory")?;
            config::init_config(&path, force)
        }
    }
}

fn cmd_render(
    mut config: Config,
    data: PathBuf,
    out: PathBuf,
    width: Option<u32>,
    theme: Option<String>,
    seed: Option<u64>,
    font: Option<PathBuf>,
) -> Result<()> {
    if let Some(width) = width {
        config.display.width = width;
    }
    if let Some(theme) = theme {
        config.display.theme = theme;
    }
    if let Some(seed) = seed {
        config.cloud.seed = Some(seed);
    }
    if let Some(font) = font {
        config.font.path = Some(font);
    }

    let records = data::load_records(&data)?;
    let words = data::normalize(&records);
    let font = LoadedFont::resolve(&config.font)?;
    let theme = Theme::from_name(&config.display.theme);

    let canvas_size = config.display.canvas();
    let mut rng = layout::pass_rng(config.cloud.seed);
    let placements = layout::layout_words(&words, canvas_size, &config.cloud.params(), &font, &mut rng);

    let mut canvas = Canvas::new(canvas_size);
    CloudPainter::new(&font, &theme).paint(&mut canvas, &placements);
    canvas.save_png(&out)?;

    println!(
        "Rendered {}/{} words to {}",
        placements.len(),
        words.len(),
        out.display()
    );
    Ok(())
}

fn cmd_layout(mut config: Config, data: PathBuf, width: Option<u32>, seed: Option<u64>) -> Result<()> {
    if let Some(width) = width {
        config.display.width = width;
    }
    if let Some(seed) = seed {
        config.cloud.seed = Some(seed);
    }

    let records = data::load_records(&data)?;
    let words = data::normalize(&records);

    // Placements without a drawing surface fall back to approximate widths
    let measurer: Box<dyn Measure> = match LoadedFont::resolve(&config.font) {
        Ok(font) => Box::new(font),
        Err(error) => {
            tracing::warn!(%error, "no usable font, measuring heuristically");
            Box::new(HeuristicMeasure)
        }
    };

    let canvas_size = config.display.canvas();
    let mut rng = layout::pass_rng(config.cloud.seed);
    let placements = layout::layout_words(&words, canvas_size, &config.cloud.params(), &*measurer, &mut rng);

    let report = PassReport::new(canvas_size, words.len(), placements);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
