use std::path::PathBuf;

use clap::Parser;

use super::Config;

/// Command-line arguments. Anything given here wins over the config file.
#[derive(Parser, Debug, Default)]
#[command(name = "solar-orrery", about = "Sun, earth and moon, spinning")]
pub struct CliArgs {
    /// Path to a RON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Initial animation speed multiplier.
    #[arg(long)]
    pub speed: Option<f32>,

    /// Start with the animation paused.
    #[arg(long)]
    pub paused: bool,

    /// Log filter (error, warn, info, debug, trace, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(speed) = args.speed {
            self.animation.initial_speed = speed.max(0.0);
        }
        if args.paused {
            self.animation.start_playing = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
