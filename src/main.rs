use anyhow::Result;
use clap::Parser;

use shadow_drill::cli::commands::{
    config::ConfigCommand, moves::MovesCommand, run::RunCommand, sequences::SequencesCommand,
    show_how_to_start, Command,
};
use shadow_drill::cli::{Cli, Commands};
use shadow_drill::config::ShadowDrillConfig;
use shadow_drill::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    ShadowDrillConfig::load_env_file()?;
    let config = ShadowDrillConfig::load()?;
    init_telemetry(&config.observability)?;

    match cli.command {
        // No subcommand: explain how to start a workout
        None => tokio::runtime::Runtime::new()?.block_on(async { show_how_to_start().await }),
        Some(Commands::Moves { speed }) => tokio::runtime::Runtime::new()?.block_on(async {
            MovesCommand::new().with_speed(speed).execute().await
        }),
        Some(Commands::Sequences { json }) => tokio::runtime::Runtime::new()?.block_on(async {
            SequencesCommand::new().with_json(json).execute().await
        }),
        Some(Commands::Run {
            moves,
            sequence,
            custom,
            goal,
            minutes,
            speed,
            speak,
            seed,
        }) => {
            let command = RunCommand::new(config)
                .with_moves(moves)
                .with_sequence(sequence)
                .with_custom(custom)
                .with_goals(goal)
                .with_minutes(minutes)
                .with_speed(speed)
                .with_speech(speak)
                .with_seed(seed);
            tokio::runtime::Runtime::new()?.block_on(async { command.execute().await })
        }
        Some(Commands::Config { write }) => tokio::runtime::Runtime::new()?.block_on(async {
            ConfigCommand::new(config).with_write(write).execute().await
        }),
    }
}
