mod config;
mod image_prep;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use config::CliConfig;
use logging::{EncodeSummaryEvent, LogEvent, StructuredLogger};
use sstv_core::{Encoder, Mode};

#[derive(Parser, Debug)]
#[command(author, version, about = "Encode an image as an SSTV audio waveform", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// SSTV mode name (e.g. MartinM1, ScottieS1, Robot36, Pd120)
    #[arg(short, long)]
    mode: Option<String>,

    /// Input image path
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output WAV path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PCM sample rate in Hz
    #[arg(long)]
    sample_rate: Option<u32>,

    /// PCM bit depth: 8 or 16
    #[arg(long)]
    bits: Option<u8>,

    /// Enable the VOX preamble
    #[arg(long)]
    vox: bool,

    /// FSKID text trailer to append
    #[arg(long)]
    fskid: Option<String>,

    /// Enable verbose diagnostic output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => CliConfig::from_file(path).wrap_err_with(|| format!("failed to load config from {path}"))?,
        None => CliConfig::default(),
    };

    if let Some(mode) = &args.mode {
        config.mode = Some(mode.clone());
    }
    if let Some(input) = &args.input {
        config.input_image = Some(input.clone());
    }
    if let Some(output) = &args.output {
        config.wav_output = Some(output.clone());
    }
    if let Some(sample_rate) = args.sample_rate {
        config.encoder.sample_rate = sample_rate;
    }
    if let Some(bits) = args.bits {
        config.encoder.bits = bits;
    }
    if args.vox {
        config.encoder.vox_enabled = true;
    }
    if let Some(fskid) = &args.fskid {
        config.encoder.fskid_text = Some(fskid.clone());
    }

    let mut logger = StructuredLogger::new(config.logging.clone())?;

    let mode_name = config.mode.as_ref().ok_or_else(|| eyre!("a mode is required (--mode or config `mode`)"))?;
    let mode = Mode::from_name(mode_name).ok_or_else(|| eyre!("unknown SSTV mode: {mode_name}"))?;

    let input_path = config.input_image.as_ref().ok_or_else(|| eyre!("an input image is required (--input or config `input_image`)"))?;
    let output_path = config.wav_output.as_ref().ok_or_else(|| eyre!("an output WAV path is required (--output or config `wav_output`)"))?;

    logger.log(LogEvent::Info { message: format!("Encoding {} with mode {}", input_path.display(), mode.name()) })?;

    let descriptor = mode.descriptor();
    let pixel_field = image_prep::load_and_fit(input_path, descriptor.width, descriptor.height, mode.is_grayscale())
        .wrap_err("failed to prepare input image")?;

    let encoder_config = config.encoder.to_encoder_config()?;
    let encoder = Encoder::new(mode, &pixel_field, encoder_config.clone())?;

    for entry in encoder.diagnostics() {
        logger.log(LogEvent::Warn { message: entry.message.clone() })?;
    }

    // Sample count isn't known ahead of synthesis, so this is a spinner
    // ticking on a sample-count message rather than a bounded bar.
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner} encoding {prefix}: {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.set_prefix(mode.name().to_string());

    let progress_every = (descriptor.width as u64).max(1);
    let mut samples = Vec::new();
    for (i, sample) in encoder.samples()?.enumerate() {
        samples.push(sample);
        if i as u64 % progress_every == 0 {
            progress.set_message(format!("{} samples", i + 1));
            progress.tick();
        }
    }
    progress.finish_and_clear();

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: encoder_config.sample_rate,
        bits_per_sample: encoder_config.bit_depth.bits() as u16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(output_path, spec).wrap_err("failed to create WAV file")?;
    match encoder_config.bit_depth {
        sstv_core::BitDepth::Eight => {
            for sample in &samples {
                writer.write_sample(*sample as i8)?;
            }
        }
        sstv_core::BitDepth::Sixteen => {
            for sample in &samples {
                writer.write_sample(*sample as i16)?;
            }
        }
    }
    writer.finalize()?;

    let summary = EncodeSummaryEvent {
        timestamp: chrono::Utc::now(),
        mode: mode.name().to_string(),
        sample_rate: encoder_config.sample_rate,
        bit_depth_bits: encoder_config.bit_depth.bits(),
        vox_enabled: encoder_config.vox_enabled,
        fskid_enabled: encoder_config.has_fskid(),
        sample_count: samples.len(),
        duration_secs: logger.elapsed(),
        wav_path: output_path.display().to_string(),
    };
    logger.log(LogEvent::EncodeSummary(summary))?;

    if args.verbose {
        logger.log(LogEvent::Info { message: format!("Wrote {} samples to {}", samples.len(), output_path.display()) })?;
    }

    Ok(())
}
