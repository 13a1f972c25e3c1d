use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use strata::{Image, parse_pipeline, run_pipeline};

#[derive(Parser, Debug)]
#[command(name = "strata", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a BMP, run a pipeline over it, and write the result.
    Apply(ApplyArgs),
    /// Print decoded geometry of a BMP.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input 24bpp uncompressed BMP.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output BMP path.
    #[arg(long)]
    out: PathBuf,

    /// Pipeline JSON (`{ "ops": [ { "kind": ..., "params": ... } ] }`).
    /// When omitted the input is round-tripped unchanged.
    #[arg(long)]
    pipeline: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input 24bpp uncompressed BMP.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut reader = BufReader::new(
        File::open(&args.in_path).with_context(|| format!("open {}", args.in_path.display()))?,
    );
    let mut image = Image::decode(&mut reader)?;

    if let Some(pipeline_path) = &args.pipeline {
        let spec = std::fs::read_to_string(pipeline_path)
            .with_context(|| format!("read {}", pipeline_path.display()))?;
        let spec = serde_json::from_str(&spec).context("parse pipeline json")?;
        let ops = parse_pipeline(&spec)?;
        let layer = image.layers.get_mut(1)?;
        run_pipeline(layer, &ops);
    }

    let mut out =
        File::create(&args.out).with_context(|| format!("create {}", args.out.display()))?;
    image.encode(&mut out)?;
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let mut reader = BufReader::new(
        File::open(&args.in_path).with_context(|| format!("open {}", args.in_path.display()))?,
    );
    let image = Image::decode(&mut reader)?;
    let layer = image.layers.get(1)?;
    println!(
        "{}x{} 24bpp, pixel data at offset {}, {} padding byte(s) per row",
        layer.width(),
        layer.height(),
        image.file_header.pixel_data_offset,
        strata::row_padding(layer.width())
    );
    Ok(())
}
