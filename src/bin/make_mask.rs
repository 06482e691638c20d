#[macro_use]
extern crate tracing;

use anyhow::{bail, Context, Result};
use binary_ccl::{
    mask::{generate_mask, save_mask, MaskMethod, MaskOptions},
    utils,
    verify::component_count,
    Connectivity, Strategy,
};
use clap::Parser;
use glob::glob;
use rayon::prelude::*;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

#[derive(Debug, Parser)]
struct Args {
    /// Input image
    #[clap(short, long, value_parser)]
    input: Option<PathBuf>,

    /// Directory of input images (*.png, *.jpg, *.jpeg)
    #[clap(long, value_parser)]
    input_dir: Option<PathBuf>,

    /// Output mask file, or output directory with --input-dir
    #[clap(short, long, value_parser)]
    output: PathBuf,

    /// JSON file with mask options; overrides the flags below
    #[clap(long, value_parser)]
    options: Option<PathBuf>,

    /// Threshold method: gray, otsu or darkness
    #[clap(short, long, value_parser, default_value = "otsu")]
    method: MaskMethod,

    /// Swap foreground and background
    #[clap(long)]
    invert: bool,

    /// Gaussian sigma before Otsu thresholding (0 disables)
    #[clap(long, default_value_t = 1)]
    smooth: u32,

    /// Rounds of morphological opening (0 disables)
    #[clap(long, default_value_t = 1)]
    morph_open: u8,

    /// Number of threads
    #[clap(short = 't', long)]
    num_threads: Option<usize>,
}

fn process(input: &Path, output: &Path, options: &MaskOptions) -> Result<()> {
    let begin = Instant::now();
    let img = image::open(input).with_context(|| format!("cannot read {}", input.display()))?;
    let mask = generate_mask(&img, options)?;
    save_mask(&mask, output)?;

    let (height, width) = mask.shape();
    let labels = Strategy::TwoPass.label(&mask, Connectivity::Four);
    info!(
        "{} -> {}: {}x{}, foreground {:.1}%, {} components, done in {:?}",
        input.display(),
        output.display(),
        height,
        width,
        100. * mask.foreground_count() as f64 / (height * width).max(1) as f64,
        component_count(&labels),
        Instant::now() - begin
    );
    Ok(())
}

fn main() -> Result<()> {
    utils::init_tracing_subscriber("info")?;
    let args = Args::parse();
    info!("args: {:#?}", args);
    utils::setup_rayon(args.num_threads)?;

    let options = match &args.options {
        Some(path) => MaskOptions::from_json_file(path)?,
        None => MaskOptions {
            method: args.method,
            invert: args.invert,
            smooth: args.smooth,
            morph_open: args.morph_open,
        },
    };
    info!("mask options: {:?}", options);

    match (&args.input, &args.input_dir) {
        (Some(input), None) => process(input, &args.output, &options),
        (None, Some(input_dir)) => {
            std::fs::create_dir_all(&args.output)?;
            let mut inputs = Vec::new();
            for ext in ["png", "jpg", "jpeg"] {
                for f in glob(&input_dir.join(format!("*.{ext}")).to_string_lossy())? {
                    inputs.push(f?);
                }
            }
            info!("found {} images in {}", inputs.len(), input_dir.display());

            inputs.par_iter().try_for_each(|input| -> Result<()> {
                let stem = input
                    .file_stem()
                    .context("input without file name")?
                    .to_string_lossy();
                let output = args.output.join(format!("{stem}_mask.png"));
                process(input, &output, &options)
            })
        }
        _ => bail!("need exactly one of --input or --input-dir"),
    }
}
