#![deny(missing_docs)]

//! Command-line front end: WAV file in, log-mel spectrogram out.
use std::path::{Path, PathBuf};
use std::time::Instant;

use melprep::analysis::log_mel::{
    LogMelExtractor, MelFilterbank, MelSpectrogram, TracingObserver,
};
use melprep::config::{self, Settings};
use melprep::logging;
use serde::Serialize;

struct Options {
    input: PathBuf,
    filters: Option<PathBuf>,
    config: Option<PathBuf>,
    threads: Option<usize>,
    output: Option<PathBuf>,
    summary_json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    input: &'a Path,
    n_mels: usize,
    n_frames: usize,
    min: f32,
    max: f32,
    workers: usize,
    elapsed_ms: u128,
}

enum Command {
    Run(Options),
    Help,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            print!("{}", help_text());
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let logging_ready = match logging::init() {
        Ok(_) => true,
        Err(err) => {
            eprintln!("Logging disabled: {err}");
            false
        }
    };

    if let Err(err) = run(&opts) {
        // The console layer already writes errors to stderr.
        if logging_ready {
            tracing::error!("{err}");
        } else {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

fn run(opts: &Options) -> Result<(), String> {
    let settings = load_settings(opts.config.as_deref())?;
    let workers = opts
        .threads
        .filter(|&threads| threads > 0)
        .unwrap_or_else(|| settings.worker_count());
    let filters = load_filterbank(opts.filters.as_deref(), &settings)?;

    let extractor = LogMelExtractor::new(settings.mel)
        .map_err(|err| err.to_string())?
        .with_workers(workers);
    let started = Instant::now();
    let mel = extractor
        .extract_file(&opts.input, filters.weights(), &TracingObserver)
        .map_err(|err| err.to_string())?;
    let elapsed = started.elapsed();

    if let Some(path) = &opts.output {
        std::fs::write(path, mel.to_le_bytes())
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        tracing::info!(
            "Wrote {}x{} spectrogram to {}",
            mel.n_mels(),
            mel.n_frames(),
            path.display()
        );
    }
    if opts.summary_json {
        let summary = summarize(&opts.input, &mel, workers, elapsed.as_millis());
        let text = serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())?;
        println!("{text}");
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings, String> {
    match path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())
}

fn load_filterbank(cli_path: Option<&Path>, settings: &Settings) -> Result<MelFilterbank, String> {
    let bank = match cli_path.or(settings.filters_path.as_deref()) {
        Some(path) => MelFilterbank::from_filters_file(path).map_err(|err| err.to_string())?,
        None => {
            tracing::info!("No filters file configured; using generated Slaney filterbank");
            MelFilterbank::slaney(&settings.mel)
        }
    };
    bank.check_matches(&settings.mel)
        .map_err(|err| err.to_string())?;
    Ok(bank)
}

fn summarize<'a>(
    input: &'a Path,
    mel: &MelSpectrogram,
    workers: usize,
    elapsed_ms: u128,
) -> Summary<'a> {
    let (min, max) = mel
        .as_slice()
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    Summary {
        input,
        n_mels: mel.n_mels(),
        n_frames: mel.n_frames(),
        min,
        max,
        workers,
        elapsed_ms,
    }
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut input: Option<PathBuf> = None;
    let mut filters = None;
    let mut config = None;
    let mut threads = None;
    let mut output = None;
    let mut summary_json = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                return Ok(Command::Help);
            }
            "--input" => {
                input = Some(PathBuf::from(take_value(args, &mut idx, "--input")?));
            }
            "--filters" => {
                filters = Some(PathBuf::from(take_value(args, &mut idx, "--filters")?));
            }
            "--config" => {
                config = Some(PathBuf::from(take_value(args, &mut idx, "--config")?));
            }
            "--threads" => {
                let value = take_value(args, &mut idx, "--threads")?;
                threads = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("Invalid --threads value: {value}"))?,
                );
            }
            "--output" => {
                output = Some(PathBuf::from(take_value(args, &mut idx, "--output")?));
            }
            "--summary-json" => {
                summary_json = true;
            }
            other => {
                return Err(format!("Unknown argument: {other}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    let input = input.ok_or_else(|| format!("--input is required\n\n{}", help_text()))?;
    Ok(Command::Run(Options {
        input,
        filters,
        config,
        threads,
        output,
        summary_json,
    }))
}

fn take_value<'a>(args: &'a [String], idx: &mut usize, flag: &str) -> Result<&'a str, String> {
    *idx += 1;
    args.get(*idx)
        .map(String::as_str)
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn help_text() -> &'static str {
    "melprep\n\n\
Compute a Whisper-style log-mel spectrogram for a WAV file.\n\n\
Usage:\n  melprep --input <wav> [options]\n\n\
Options:\n\
  --input <path>     WAV file to analyze (required).\n\
  --filters <path>   Model filters file; defaults to a generated Slaney filterbank.\n\
  --config <path>    Settings TOML; defaults to .melprep/melprep.toml.\n\
  --threads <n>      Worker count; 0 means all cores.\n\
  --output <path>    Write raw little-endian f32 values (mel-major).\n\
  --summary-json     Print shape, value range and timing as JSON.\n"
}
