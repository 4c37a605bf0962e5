use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spark_gallery::renderer::{run, Canvas, TerminalBackend};
use spark_gallery::{Gallery, GalleryConfig, Palette, RecordingBackend, Surface, ThemeMode};

/// Reactive widget gallery in the terminal.
#[derive(Parser, Debug)]
#[command(name = "spark-gallery", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Surface width in cells
    #[arg(long)]
    width: Option<u16>,

    /// Surface height in cells
    #[arg(long)]
    height: Option<u16>,

    /// Title shown in the header row
    #[arg(long)]
    title: Option<String>,

    /// Palette
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Ignore drag-and-drop (pasted paths)
    #[arg(long)]
    no_drops: bool,

    /// Print one frame to stdout instead of taking over the terminal
    #[arg(long)]
    headless: bool,

    /// Write logs here (the interactive UI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// File values first, then flags, then one validation pass.
    fn load_config(&self) -> Result<GalleryConfig> {
        let mut config = match &self.config {
            Some(path) => GalleryConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => GalleryConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if self.no_drops {
            config.accepts_drops = false;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match &args.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if args.headless => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // Interactive without a log file: the terminal belongs to the UI
        None => {}
    }
    Ok(())
}

fn headless(config: GalleryConfig) -> Result<()> {
    let size = config.size();
    let mut surface = Surface::new(config, RecordingBackend::new())?;
    let mut gallery = Gallery::new(Local::now().date_naive());
    gallery.install(&mut surface);
    surface.mount()?;
    surface.resize(size)?;

    let canvas = Canvas::paint(&surface.render(), size).context("painting frame")?;
    for line in canvas.lines() {
        println!("{}", line.trim_end());
    }
    surface.unmount()?;
    Ok(())
}

fn interactive(config: GalleryConfig) -> Result<()> {
    let backend = TerminalBackend::stdout(Palette::for_mode(config.theme))
        .context("opening terminal")?;
    let mut surface = Surface::new(config, backend)?;
    let mut gallery = Gallery::new(Local::now().date_naive());
    gallery.install(&mut surface);

    run(&mut surface).context("running gallery")?;
    gallery.uninstall();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;
    let config = args.load_config()?;
    info!(title = %config.title, width = config.width, height = config.height, "starting gallery");

    if args.headless {
        headless(config)
    } else {
        interactive(config)
    }
}
