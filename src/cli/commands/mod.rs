use anyhow::Result;

pub mod config;
pub mod moves;
pub mod run;
pub mod sequences;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub async fn show_how_to_start() -> Result<()> {
    println!("🤼 Shadow Drill - Randomized Wrestling Workouts");
    println!();
    println!("To get started:");
    println!("  📋 shadow-drill moves                       # See the move catalog");
    println!("  📚 shadow-drill sequences                   # See saved sequences");
    println!("  ▶️  shadow-drill run -m Shoot -m Sprawl      # Drill the moves you pick");
    println!("  🔁 shadow-drill run -s \"Offensive Chain\"    # Drill a saved sequence");
    println!();
    println!("Options for run: --minutes 5 --speed 1.5 --speak --goal Shoot=10");
    println!();
    println!("💡 Press Ctrl-C at any time to stop a workout.");
    Ok(())
}
