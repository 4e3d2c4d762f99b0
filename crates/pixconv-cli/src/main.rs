//! pixconv: convert images locally and optionally submit them to an upload endpoint.
//!
//! Control defaults come from the same environment as the server
//! (MAX_FILE_SIZE_BYTES, ALLOWED_FORMATS, DEFAULT_QUALITY). Set PIXCONV_API_URL
//! to change the default submission target.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pixconv_cli::{control_from_config, convert_batch, init_tracing, plain_message, UploadClient};
use pixconv_core::{Config, FileCollection, Quality, TargetFormat, UploadOutcome};
use pixconv_processing::{
    probe_avif_support, ConversionFlow, Converter, ImageCompressor, ImageProcessor, RasterDecoder,
};

#[derive(Parser)]
#[command(name = "pixconv", about = "Validate, convert and submit images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images to another format
    Convert(ConvertArgs),
    /// Report whether AVIF sources can be decoded
    Probe,
    /// List target formats
    Formats,
}

#[derive(Args)]
struct ConvertArgs {
    /// Images to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Target format: jpeg, png, webp, avif or gif
    #[arg(long, default_value = "jpeg", value_parser = parse_target)]
    format: TargetFormat,
    /// Quality between 0 and 1 (lossy formats only). Defaults to DEFAULT_QUALITY
    #[arg(long, value_parser = parse_quality)]
    quality: Option<f32>,
    /// Directory converted files are written to
    #[arg(long, default_value = ".")]
    out: PathBuf,
    /// Accept list, e.g. "image/png, image/jpeg". Defaults to ALLOWED_FORMATS
    #[arg(long)]
    accept: Option<String>,
    /// Maximum source file size in bytes. Defaults to MAX_FILE_SIZE_BYTES
    #[arg(long)]
    max_bytes: Option<u64>,
    /// Upload endpoint base URL to submit converted files to
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    submit: Option<String>,
}

fn parse_target(s: &str) -> Result<TargetFormat, String> {
    TargetFormat::parse(s).map_err(|e| e.to_string())
}

fn parse_quality(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("{} is not a number", s))?;
    if !(0.0..=1.0).contains(&value) {
        return Err("quality must be between 0 and 1".to_string());
    }
    Ok(value)
}

async fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let decoder: Arc<dyn RasterDecoder> = Arc::new(ImageProcessor);

    let mut input = control_from_config(&config, args.max_bytes, args.accept);
    probe_avif_support(Arc::clone(&decoder), std::slice::from_mut(&mut input)).await;

    input.select_target(args.format);
    if let Some(quality) = args.quality {
        if !input.set_quality(Quality::new(quality)) {
            tracing::warn!(format = %args.format, "Quality is ignored for lossless formats");
        }
    }

    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("Failed to create {}", args.out.display()))?;

    let flow = ConversionFlow::new(Converter::new(decoder, Arc::new(ImageCompressor)));
    let report = convert_batch(&flow, &input, &args.files, &args.out).await;

    if let Some(url) = args.submit {
        submit(url, &report.converted).await?;
    }

    if report.failed > 0 {
        anyhow::bail!("{} file(s) were not converted", report.failed);
    }
    Ok(())
}

async fn submit(url: String, files: &FileCollection) -> anyhow::Result<()> {
    if files.is_empty() {
        tracing::warn!("Nothing to submit");
        return Ok(());
    }

    let client = if url.is_empty() {
        UploadClient::from_env()?
    } else {
        UploadClient::new(url)?
    };

    for outcome in client.submit(files).await? {
        match outcome {
            UploadOutcome::Success(message) => println!("{}", plain_message(&message)),
            UploadOutcome::Error(message) => eprintln!("{}", plain_message(&message)),
        }
    }
    Ok(())
}

async fn probe() {
    let decoder: Arc<dyn RasterDecoder> = Arc::new(ImageProcessor);
    let supported = probe_avif_support(decoder, &mut []).await;
    println!(
        "AVIF decode: {}",
        if supported { "supported" } else { "unsupported" }
    );
}

fn formats() {
    for format in TargetFormat::ALL {
        println!(
            "{:<5} {:<10} {}",
            format.token(),
            format.mime_type().as_str(),
            if format.is_lossless() { "lossless" } else { "lossy" }
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(args) => convert(args).await?,
        Commands::Probe => probe().await,
        Commands::Formats => formats(),
    }

    Ok(())
}
