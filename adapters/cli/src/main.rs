#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Ghost Void sandbox as a subprocess.
//!
//! Commands arrive on stdin, one frame per line. State frames leave on
//! stdout as JSON lines, while logs go to stderr.

mod protocol;

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use ghost_void_sandbox::{Frame, Orchestrator, SandboxConfig};
use tracing_subscriber::EnvFilter;

use crate::protocol::LineSource;

/// Command-line arguments for the Ghost Void simulation.
#[derive(Debug, Parser)]
#[command(name = "ghost-void", about = "Runs the Ghost Void simulation over stdin and stdout")]
struct CliArgs {
    /// TOML file holding the sandbox configuration.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Level loaded before the first frame.
    #[arg(long, value_name = "LEVEL")]
    start_level: Option<u32>,
    /// Stop after this many frames.
    #[arg(long, value_name = "COUNT")]
    max_ticks: Option<u64>,
}

/// Entry point for the Ghost Void command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing();

    let config = load_config(&args)?;
    let mut orchestrator =
        Orchestrator::new(&config).context("sandbox configuration is invalid")?;

    let mut source = LineSource::new(io::stdin().lock());
    let mut stdout = io::stdout().lock();
    let reason = orchestrator.run(&mut source, |frame| write_frame(&mut stdout, frame))?;

    if let Some(error) = source.take_error() {
        return Err(error).context("failed to read commands from stdin");
    }
    tracing::info!(?reason, "simulation finished");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &CliArgs) -> Result<SandboxConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            SandboxConfig::from_toml_str(&source)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        None => SandboxConfig::default(),
    };

    if let Some(level) = args.start_level {
        config.start_level = level;
    }
    if let Some(limit) = args.max_ticks {
        config.max_ticks = Some(limit);
    }
    Ok(config)
}

fn write_frame(out: &mut impl Write, frame: &Frame) -> Result<()> {
    let line = protocol::encode_frame(frame).context("failed to encode state frame")?;
    writeln!(out, "{line}").context("failed to write state frame")?;
    out.flush().context("failed to flush stdout")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from(["ghost-void", "--start-level", "2", "--max-ticks", "10"]);
        let config = load_config(&args).expect("defaults load");
        assert_eq!(config.start_level, 2);
        assert_eq!(config.max_ticks, Some(10));
        assert_eq!(config.city, SandboxConfig::default().city);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let args = CliArgs::parse_from(["ghost-void", "--config", "/nonexistent/ghost-void.toml"]);
        let error = load_config(&args).expect_err("file is missing");
        assert!(error.to_string().contains("failed to read config file"));
    }

    #[test]
    fn written_frames_end_with_newline() {
        let mut orchestrator =
            Orchestrator::new(&SandboxConfig::default()).expect("default config");
        let frame = orchestrator.step(Vec::new());
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &frame).expect("frame written");
        let text = String::from_utf8(buffer).expect("utf8 output");
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);
    }
}
