use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use image::Rgb;
use selfie_fx::segmentation::{create_onnx_model, SegmentationModel};
use selfie_fx::{io, PipelineConfig, SegmentationPipeline};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the portrait segmentation model (ONNX file)
    #[arg(short, long)]
    model: PathBuf,

    /// Extra model to benchmark against the primary one on the same input
    /// (may be repeated)
    #[arg(long)]
    compare_model: Vec<PathBuf>,

    /// Probability above which a pixel belongs to a class
    #[arg(long, default_value_t = 0.5)]
    threshold: f32,

    /// Threads ONNX Runtime may use inside one operator
    #[arg(long, default_value_t = 4)]
    intra_threads: usize,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every class mask of a portrait as a separate image
    Segment {
        /// Portrait to segment
        image: PathBuf,

        /// Directory receiving the masks
        #[arg(short, long, default_value = "masks")]
        out_dir: PathBuf,
    },

    /// Tint the hair of a portrait
    Hair {
        /// Portrait to recolor
        image: PathBuf,

        /// Hair color as R,G,B or #RRGGBB
        #[arg(short, long, value_parser = parse_color)]
        color: Rgb<u8>,

        /// Output image path
        #[arg(short, long, default_value = "hair.png")]
        output: PathBuf,
    },

    /// Replace the background of a portrait with another photo
    Background {
        /// Photo to place behind the subject
        background: PathBuf,

        /// Portrait whose background is replaced
        foreground: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "background.png")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("selfie-fx starting");

    let mut models: Vec<Box<dyn SegmentationModel>> = Vec::new();
    for path in std::iter::once(&args.model).chain(&args.compare_model) {
        let model = create_onnx_model(path, args.intra_threads)
            .with_context(|| format!("Failed to load segmentation model {}", path.display()))?;
        models.push(model);
    }

    let config = PipelineConfig {
        threshold: args.threshold,
    };
    let mut pipeline =
        SegmentationPipeline::new(models, config).context("Failed to build pipeline")?;

    run(&mut pipeline, args.command)
}

fn run(pipeline: &mut SegmentationPipeline, command: Command) -> Result<()> {
    match command {
        Command::Segment { image, out_dir } => {
            let portrait = io::load_rgb(&image)?;
            let report = pipeline
                .segment(&portrait)
                .context("Failed to segment image")?;

            let written = io::export_segmentation(&report, &out_dir)?;
            println!("{}", report.summary());
            for (i, path) in written.iter().enumerate() {
                println!("{}. {}", i, path.display());
            }
        }
        Command::Hair {
            image,
            color,
            output,
        } => {
            let portrait = io::load_rgb(&image)?;
            let result = pipeline
                .recolor_hair(&portrait, color)
                .context("Failed to recolor hair")?;

            io::save_rgb(&result.image, &output)?;
            println!("{}", result.summary());
        }
        Command::Background {
            background,
            foreground,
            output,
        } => {
            let background = io::load_rgb(&background)?;
            let foreground = io::load_rgb(&foreground)?;
            let result = pipeline
                .replace_background(&background, &foreground)
                .context("Failed to replace background")?;

            io::save_rgb(&result.image, &output)?;
            println!("{}", result.summary());
        }
    }

    Ok(())
}

/// Parse `R,G,B` (decimal components) or `#RRGGBB`
fn parse_color(value: &str) -> Result<Rgb<u8>> {
    let value = value.trim();

    if let Some(hex) = value.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("expected #RRGGBB, got {value}");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex digits in {value}"))
        };
        return Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]));
    }

    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        bail!("expected R,G,B, got {value}");
    }
    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("color component {part} is not in 0..=255"))?;
    }
    Ok(Rgb(rgb))
}
