use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "shadow-drill")]
#[command(about = "Randomized shadow wrestling drills with timed move rotation")]
#[command(long_about = "Shadow Drill cycles randomly through the wrestling moves you select, holding each \
                       one on screen for its duration until the workout time runs out. Get started with \
                       'shadow-drill run --move Shoot --move Sprawl'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the move catalog with hold times
    Moves {
        /// Playback speed used to compute hold times
        #[arg(long, default_value = "1.0", help = "Speed multiplier between 0.5 and 2.0")]
        speed: f64,
    },
    /// List saved sequences
    Sequences {
        /// Print sequences as JSON
        #[arg(long, help = "Emit machine-readable JSON instead of a table")]
        json: bool,
    },
    /// Play a workout in the terminal
    Run {
        /// Select a move by name (repeatable)
        #[arg(long = "move", short = 'm', value_name = "NAME", help = "Catalog move to include, case-insensitive")]
        moves: Vec<String>,
        /// Start from a saved sequence
        #[arg(long, short = 's', value_name = "NAME", help = "Saved sequence to load before adding --move selections")]
        sequence: Option<String>,
        /// Add a custom move (repeatable)
        #[arg(long, value_name = "NAME:SECONDS", value_parser = commands::run::parse_custom_move)]
        custom: Vec<(String, u32)>,
        /// Set a completion goal (repeatable)
        #[arg(long, value_name = "NAME=N|auto", value_parser = commands::run::parse_goal)]
        goal: Vec<(String, crate::moves::Quantity)>,
        /// Workout length in minutes
        #[arg(long, help = "Total workout length in minutes (1-60 by default)")]
        minutes: Option<u32>,
        /// Playback speed multiplier
        #[arg(long, help = "Speed multiplier between 0.5 and 2.0")]
        speed: Option<f64>,
        /// Speak each move through the configured speech program
        #[arg(long, help = "Announce moves with text-to-speech")]
        speak: bool,
        /// Seed for a reproducible move order
        #[arg(long, help = "Fix the random seed to repeat a workout")]
        seed: Option<u64>,
    },
    /// Print the effective configuration as TOML
    Config {
        /// Also write the configuration to a file
        #[arg(long, value_name = "PATH", help = "Write the effective configuration to PATH")]
        write: Option<String>,
    },
}
