use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bytebeat::{
    config::{Config, ConfigLoader, LogMode},
    log_debug, log_fatal, log_info, logger,
    manager::FormulaManager,
    publish,
};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Bytebeat: integer formulas rendered as audio.",
    long_about = "Checks, evaluates and renders bytebeat formulas.\n
    Formulas are integer expressions over t (samples at 8 kHz), T (tempo ticks)
    and the macros w, x, y, z."
)]
struct Cli {
    /// Configuration file to use instead of the default one
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a formula and print its folded tree or the first error
    Check {
        formula: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the raw values of one block
    Eval {
        /// Formula to evaluate, the configured one if omitted
        formula: Option<String>,

        /// Number of samples
        #[arg(short = 'n', long, default_value_t = 16)]
        len: usize,

        /// Sample index the block starts at
        #[arg(long, default_value_t = 0)]
        start: u64,
    },
    /// Render a formula to a 32-bit float WAV file
    Render {
        /// Formula to render, the configured one if omitted
        formula: Option<String>,

        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        #[arg(short, long, default_value_t = 10.0)]
        seconds: f64,
    },
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let loader = match path {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new()?,
    };
    loader
        .load_or_create()
        .with_context(|| format!("Failed to load {}", loader.config_path().display()))
}

// Loading the config may already have logged, so switch modes on whatever
// logger is installed.
fn apply_log_mode(mode: LogMode) {
    match mode {
        LogMode::Standalone => logger::set_standalone_mode(),
        LogMode::File => {
            logger::set_file_mode();
            if let Some(path) = logger::get_logger().log_file_path() {
                eprintln!("Logging to {}", path.display());
            }
        }
        LogMode::Silent => logger::set_silent_mode(),
    }
}

fn check(manager: &mut FormulaManager, json: bool) -> Result<ExitCode> {
    let result = manager.parse();
    if json {
        let value = match &result {
            Ok(expr) => serde_json::json!({
                "ok": true,
                "formula": expr.to_string(),
                "tree": expr,
            }),
            Err(error) => serde_json::json!({
                "ok": false,
                "error": error,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        match &result {
            Ok(expr) => println!("{expr}"),
            Err(error) => println!("{error}"),
        }
    }
    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn eval(manager: &mut FormulaManager, config: &Config, len: usize, start: u64) -> Result<ExitCode> {
    let expr = match manager.parse() {
        Ok(expr) => expr,
        Err(error) => {
            println!("{error}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut clock = config.block_clock();
    clock.elapsed = start;
    let mut renderer = manager.renderer(clock, len).with_tree(expr);
    renderer.macros = config.macros;
    for value in renderer.next_block(len).unwrap_or_default() {
        println!("{value}");
    }
    Ok(ExitCode::SUCCESS)
}

fn render(manager: FormulaManager, config: &Config, out: PathBuf, seconds: f64) -> Result<ExitCode> {
    let (publisher, subscriber) = publish::channel(1);
    let mut manager = manager.with_publisher(publisher);
    if let Err(error) = manager.parse() {
        println!("{error}");
        return Ok(ExitCode::FAILURE);
    }

    let channels = config.audio.channels;
    let spec = hound::WavSpec {
        channels,
        sample_rate: config.audio.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&out, spec)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let block_size = config.audio.block_size;
    let mut renderer = manager
        .renderer(config.block_clock(), block_size)
        .with_subscriber(subscriber);
    renderer.macros = config.macros;

    let total_frames = (seconds.max(0.0) * config.audio.sample_rate as f64).round() as u64;
    log_debug!("Rendering {total_frames} frames in blocks of {block_size}");
    let mut buffer = vec![0.0f32; block_size * channels as usize];
    let mut remaining = total_frames;
    while remaining > 0 {
        let frames = remaining.min(block_size as u64) as usize;
        let block = &mut buffer[..frames * channels as usize];
        renderer.render(block, channels as usize);
        for &sample in block.iter() {
            writer.write_sample(sample).context("Failed to write sample")?;
        }
        remaining -= frames as u64;
    }
    writer.finalize().context("Failed to finalize WAV file")?;

    log_info!("Rendered {total_frames} frames to {}", out.display());
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::init_standalone();
    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            log_fatal!("{e:#}");
            return Ok(ExitCode::FAILURE);
        }
    };
    apply_log_mode(config.logging.mode);

    let mut manager = FormulaManager::default();
    match cli.command {
        Command::Check { formula, json } => {
            manager.set_formula(formula);
            check(&mut manager, json)
        }
        Command::Eval { formula, len, start } => {
            manager.set_formula(formula.unwrap_or_else(|| config.formula.text.clone()));
            eval(&mut manager, &config, len, start)
        }
        Command::Render {
            formula,
            out,
            seconds,
        } => {
            manager.set_formula(formula.unwrap_or_else(|| config.formula.text.clone()));
            render(manager, &config, out, seconds)
        }
    }
}
