//! gesture_control: command-line entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gesture_control::app::{run, AppConfig, SourceKind};
use gesture_engine::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "gesture_control", version, about = "Control the desktop with hand gestures")]
struct Args {
    /// TOML file with engine settings (thresholds, cooldowns, output).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where landmark frames come from.
    #[arg(long, value_enum, default_value_t = SourceKind::Sim)]
    source: SourceKind,
    /// Recording to replay (with `--source replay`).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Record every frame to this JSON-lines file.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Directory for screenshots (overrides the config file).
    #[arg(long)]
    screenshot_dir: Option<PathBuf>,
    /// Inject real key presses and take real screenshots.
    #[arg(long, default_value_t = false)]
    desktop: bool,
    /// Simulator frame rate.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,
    /// Ignore bridge hands scoring below this.
    #[arg(long, default_value_t = 0.7)]
    min_confidence: f32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut engine = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None       => EngineConfig::default(),
    };
    if let Some(dir) = args.screenshot_dir {
        engine.dispatch.screenshot_dir = dir;
    }

    print_banner(args.source, args.desktop);

    let summary = run(AppConfig {
        engine,
        source:         args.source,
        input:          args.input,
        record:         args.record,
        desktop:        args.desktop,
        fps:            args.fps,
        min_confidence: args.min_confidence,
    })?;

    println!();
    print!("{}", summary);
    Ok(())
}

fn print_banner(source: SourceKind, desktop: bool) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Gesture Control: hands-free desktop             ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Source: {:?}    Output: {}", source, if desktop { "desktop" } else { "dry run" });
    println!();
    println!("  Fist ........................ stop (nothing fires)");
    println!("  Open hand ................... reset zoom");
    println!("  Index + middle + ring ....... screenshot");
    println!("  Thumb + index, open / close . zoom in / out");
    println!("  Index + middle, apart / close scroll left / right");
    println!("  Index pointing up / down .... scroll up / down");
    println!();
    if source == SourceKind::Sim {
        println!("  Type: open | fist | three | pinch <d> | two <gap> | point up|down | none | q");
        println!();
    }
}
