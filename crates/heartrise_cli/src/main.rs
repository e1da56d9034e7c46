//! Heartrise CLI
//!
//! Write a session config, run the heart animation headlessly, and dump
//! frames as JSON or PNG.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod compose;
mod config;
mod session;

use config::{SessionConfig, DEFAULT_CONFIG_FILE};
use session::Session;

#[derive(Parser)]
#[command(name = "heartrise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Rising heart particle animation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default session config
    Init {
        /// Config file to create
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run a session and report what happened
    Simulate {
        /// Session config
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Print every frame as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Run a session and save frames as PNG images
    Render {
        /// Session config
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,

        /// Save every Nth frame
        #[arg(short, long, default_value = "1")]
        every: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so JSON frames on stdout stay clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),

        Commands::Simulate { config, json } => cmd_simulate(&config, json),

        Commands::Render { config, out, every } => cmd_render(&config, &out, every),
    }
}

/// Directory that relative image paths in `config` resolve against
fn config_base(config: &Path) -> &Path {
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let text = SessionConfig::default().to_toml()?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn cmd_simulate(config_path: &Path, json: bool) -> Result<()> {
    let config = SessionConfig::load(config_path)?;
    let session = Session::new(&config, config_base(config_path))?;
    let bounds = session.bounds();
    info!(
        "Simulating {} hearts in {}x{}",
        config.run.spawn_count, bounds.width, bounds.height
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = session.run(|frame| {
        if json {
            serde_json::to_writer(&mut out, frame)?;
            writeln!(out)?;
        }
        Ok(())
    })?;

    if json {
        serde_json::to_writer(&mut out, &summary)?;
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_render(config_path: &Path, out_dir: &Path, every: u64) -> Result<()> {
    if every == 0 {
        anyhow::bail!("--every must be at least 1");
    }

    let config = SessionConfig::load(config_path)?;
    let session = Session::new(&config, config_base(config_path))?;
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let bounds = session.bounds();
    let mut saved = 0u64;
    session.run(|frame| {
        if frame.index % every != 0 {
            return Ok(());
        }
        let canvas = compose::compose_frame(bounds, &frame.sprites, session.images());
        let path = out_dir.join(format!("frame_{:05}.png", frame.index));
        canvas
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        saved += 1;
        Ok(())
    })?;

    info!("Saved {} frames to {}", saved, out_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_base() {
        assert_eq!(config_base(Path::new("heartrise.toml")), Path::new("."));
        assert_eq!(config_base(Path::new("demo/heartrise.toml")), Path::new("demo"));
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        cmd_init(&path, false).unwrap();
        assert!(cmd_init(&path, false).is_err());
        cmd_init(&path, true).unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.run.spawn_count, 5);
    }

    #[test]
    fn test_render_writes_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &config_path,
            "[hearts]\nseed = 3\nduration_ms = 1000.0\n\n[run]\nspawn_count = 1\n",
        )
        .unwrap();

        let out = dir.path().join("frames");
        cmd_render(&config_path, &out, 10).unwrap();

        assert!(out.join("frame_00000.png").exists());
        assert!(out.join("frame_00010.png").exists());
        assert!(!out.join("frame_00001.png").exists());
    }
}
