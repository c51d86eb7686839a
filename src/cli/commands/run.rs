use anyhow::{anyhow, bail, Result};
use std::io::Write;
use tracing::{info, warn};

use super::Command;
use crate::config::ShadowDrillConfig;
use crate::moves::{Move, MoveId, Quantity};
use crate::workout::{format_clock, hold_seconds, SessionContext, SessionHandle, SessionSnapshot};

/// Parse `NAME:SECONDS`; the name may itself contain colons
pub fn parse_custom_move(raw: &str) -> Result<(String, u32), String> {
    let (name, secs) = raw
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:SECONDS, got '{raw}'"))?;
    let secs: u32 = secs
        .trim()
        .parse()
        .map_err(|_| format!("'{secs}' is not a whole number of seconds"))?;
    if name.trim().is_empty() || secs == 0 {
        return Err(format!("custom move needs a name and at least 1 second, got '{raw}'"));
    }
    Ok((name.trim().to_string(), secs))
}

/// Parse `NAME=N` or `NAME=auto`
pub fn parse_goal(raw: &str) -> Result<(String, Quantity), String> {
    let (name, quantity) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=N or NAME=auto, got '{raw}'"))?;
    let quantity: Quantity = quantity.parse()?;
    if !quantity.is_valid() {
        return Err(format!("goal for '{name}' must be at least 1"));
    }
    Ok((name.trim().to_string(), quantity))
}

pub struct RunCommand {
    pub config: ShadowDrillConfig,
    pub moves: Vec<String>,
    pub sequence: Option<String>,
    pub custom: Vec<(String, u32)>,
    pub goals: Vec<(String, Quantity)>,
    pub minutes: Option<u32>,
    pub speed: Option<f64>,
}

impl RunCommand {
    pub fn new(config: ShadowDrillConfig) -> Self {
        Self {
            config,
            moves: Vec::new(),
            sequence: None,
            custom: Vec::new(),
            goals: Vec::new(),
            minutes: None,
            speed: None,
        }
    }

    pub fn with_moves(mut self, moves: Vec<String>) -> Self {
        self.moves = moves;
        self
    }

    pub fn with_sequence(mut self, sequence: Option<String>) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_custom(mut self, custom: Vec<(String, u32)>) -> Self {
        self.custom = custom;
        self
    }

    pub fn with_goals(mut self, goals: Vec<(String, Quantity)>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_minutes(mut self, minutes: Option<u32>) -> Self {
        self.minutes = minutes;
        self
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speech(mut self, speak: bool) -> Self {
        if speak {
            self.config.announcer.enabled = true;
        }
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.config.workout.rng_seed = seed;
        }
        self
    }

    /// Apply selections and settings before the clock starts
    async fn prepare(&self, session: &SessionHandle) -> Result<()> {
        if let Some(name) = &self.sequence {
            let sequence = session
                .read(|s| s.library().find_by_name(name).map(|seq| seq.id))
                .await
                .ok_or_else(|| anyhow!("Unknown sequence '{name}'"))?;
            session.load_sequence(sequence).await;
        }

        for name in &self.moves {
            let (id, selected) = session
                .read(|s| s.catalog().find_by_name(name).map(|m| (m.id, m.selected)))
                .await
                .ok_or_else(|| anyhow!("Unknown move '{name}'. Run 'shadow-drill moves' to list them"))?;
            if !selected {
                session.toggle_selection(id).await;
            }
        }

        for (name, secs) in &self.custom {
            session
                .add_custom_move(name, *secs)
                .await
                .ok_or_else(|| anyhow!("Could not add custom move '{name}'"))?;
        }

        for (name, quantity) in &self.goals {
            let id = find_move(session, name).await?;
            session.set_move_goal(id, *quantity).await;
        }

        if let Some(minutes) = self.minutes {
            if !session.set_workout_duration(minutes).await {
                bail!(
                    "Workout length must be between {} and {} minutes",
                    self.config.workout.min_minutes,
                    self.config.workout.max_minutes
                );
            }
        }

        if let Some(speed) = self.speed {
            if !session.set_playback_speed(speed).await {
                bail!("Speed must be between 0.5 and 2.0, got {speed}");
            }
        }

        if session.selected_moves().await.is_empty() {
            bail!("Select at least one move with --move, --sequence or --custom");
        }
        Ok(())
    }

    async fn play(&self, session: &SessionHandle) -> Result<WorkoutEnd> {
        let mut updates = session.subscribe();
        if !session.start_workout().await {
            bail!("Workout could not start");
        }

        let initial = updates.borrow_and_update().clone();
        println!(
            "▶️  {} moves · {} min · {:.1}x   (Ctrl-C to stop)",
            initial.selected_moves.len(),
            initial.workout_duration_minutes,
            initial.playback_speed
        );
        let mut shown_generation = None;
        render(&initial, &mut shown_generation)?;

        let interrupted = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl-C handler unavailable: {}", e);
                std::future::pending::<()>().await;
            }
        };
        tokio::pin!(interrupted);
        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        return Ok(WorkoutEnd::Interrupted);
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    if !snapshot.is_playing() {
                        println!();
                        return Ok(WorkoutEnd::from_stopped(&snapshot));
                    }
                    render(&snapshot, &mut shown_generation)?;
                }
                _ = &mut interrupted => {
                    println!();
                    return Ok(WorkoutEnd::Interrupted);
                }
            }
        }
    }
}

/// How a terminal workout came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkoutEnd {
    /// The clock ran out
    Completed,
    /// No selected moves were left to draw
    Exhausted,
    Interrupted,
}

impl WorkoutEnd {
    /// Completion resets elapsed time; an exhausted rotation keeps it
    fn from_stopped(snapshot: &SessionSnapshot) -> Self {
        if snapshot.elapsed_seconds == 0 {
            WorkoutEnd::Completed
        } else {
            WorkoutEnd::Exhausted
        }
    }

    fn banner(self) -> &'static str {
        match self {
            WorkoutEnd::Completed => "🏁 Workout complete!",
            WorkoutEnd::Exhausted => "⏹️  Workout stopped: no moves left to drill",
            WorkoutEnd::Interrupted => "⏹️  Workout stopped",
        }
    }
}

async fn find_move(session: &SessionHandle, name: &str) -> Result<MoveId> {
    session
        .read(|s| s.catalog().find_by_name(name).map(|m| m.id))
        .await
        .ok_or_else(|| anyhow!("Unknown move '{name}'"))
}

/// New move on its own line, clock updates in place
fn render(snapshot: &SessionSnapshot, shown_generation: &mut Option<u64>) -> std::io::Result<()> {
    let clock = format!(
        "[{} | -{}]",
        format_clock(snapshot.elapsed_seconds),
        format_clock(snapshot.remaining_seconds)
    );
    let Some(current) = &snapshot.current_move else {
        return Ok(());
    };

    let mut stdout = std::io::stdout();
    if *shown_generation != Some(snapshot.move_generation) {
        *shown_generation = Some(snapshot.move_generation);
        writeln!(stdout)?;
        write!(
            stdout,
            "{clock} {:<20} {:.1}s",
            current.name.to_uppercase(),
            hold_seconds(current.duration_secs, snapshot.playback_speed)
        )?;
    } else {
        write!(stdout, "\r{clock}")?;
    }
    stdout.flush()
}

/// Selected moves plus any move drilled before it was deselected
fn print_summary(moves: &[Move], snapshot: &SessionSnapshot, end: WorkoutEnd) {
    println!("{}", end.banner());
    println!();
    println!("📊 COMPLETED MOVES:");
    let mut any = false;
    for m in moves
        .iter()
        .filter(|m| m.selected || snapshot.completion_count(m.id) > 0)
    {
        let count = snapshot.completion_count(m.id);
        let goal = match m.quantity {
            Quantity::Auto => String::new(),
            Quantity::Goal(target) if count >= target => format!(" / {target} ✅"),
            Quantity::Goal(target) => format!(" / {target}"),
        };
        println!("  {:<20} {count}{goal}", m.name);
        any = true;
    }
    if !any {
        println!("  (none)");
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        let mut context = SessionContext::new();
        let session = context
            .init(SessionHandle::from_config(&self.config))?
            .clone();

        self.prepare(&session).await?;
        info!(
            moves = session.selected_moves().await.len(),
            "Starting terminal workout"
        );
        let end = self.play(&session).await?;
        info!(?end, "Terminal workout ended");

        print_summary(&session.available_moves().await, &session.snapshot().await, end);
        context.teardown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_custom_move() {
        assert_eq!(parse_custom_move("Headlock:5"), Ok(("Headlock".to_string(), 5)));
        assert_eq!(
            parse_custom_move("Re:Shot:2"),
            Ok(("Re:Shot".to_string(), 2))
        );
        assert!(parse_custom_move("Headlock").is_err());
        assert!(parse_custom_move("Headlock:0").is_err());
        assert!(parse_custom_move(":3").is_err());
        assert!(parse_custom_move("Headlock:abc").is_err());
    }

    #[test]
    fn test_parse_goal() {
        assert_eq!(parse_goal("Shoot=10"), Ok(("Shoot".to_string(), Quantity::Goal(10))));
        assert_eq!(parse_goal("Snap=auto"), Ok(("Snap".to_string(), Quantity::Auto)));
        assert!(parse_goal("Shoot=0").is_err());
        assert!(parse_goal("Shoot").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reports_clock_completion() {
        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_moves(vec!["Shoot".to_string(), "Block".to_string()])
            .with_minutes(Some(1))
            .with_seed(Some(3));
        let session = SessionHandle::from_config(&command.config);
        command.prepare(&session).await.unwrap();

        let end = command.play(&session).await.unwrap();
        assert_eq!(end, WorkoutEnd::Completed);
        let snapshot = session.snapshot().await;
        assert!(!snapshot.is_playing());
        assert!(snapshot.completion_counts.values().sum::<u32>() > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_reports_exhausted_rotation() {
        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_moves(vec!["Shoot".to_string()])
            .with_seed(Some(3));
        let session = SessionHandle::from_config(&command.config);
        command.prepare(&session).await.unwrap();

        let deselect = session.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(1_500)).await;
            deselect.toggle_selection(MoveId(1)).await;
        });

        let end = command.play(&session).await.unwrap();
        assert_eq!(end, WorkoutEnd::Exhausted);
        // Clock and move timer both fire at 3s, in either order
        assert!((2..=3).contains(&session.elapsed_seconds().await));
        assert_eq!(session.completion_count(MoveId(1)).await, 1);
    }

    #[test]
    fn test_stopped_snapshot_classification() {
        let mut session = crate::workout::WorkoutSession::new(
            "end-test",
            &crate::config::WorkoutConfig::default(),
        );
        session.toggle_selection(MoveId(2));
        assert_eq!(WorkoutEnd::from_stopped(&session.snapshot()), WorkoutEnd::Completed);

        session.start_workout();
        session.on_clock_tick(session.clock_generation());
        session.pause_workout();
        assert_eq!(WorkoutEnd::from_stopped(&session.snapshot()), WorkoutEnd::Exhausted);
    }

    #[tokio::test]
    async fn test_prepare_applies_selection_and_goals() {
        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_sequence(Some("offensive chain".to_string()))
            .with_moves(vec!["sprawl".to_string(), "Shoot".to_string()])
            .with_custom(vec![("Headlock".to_string(), 5)])
            .with_goals(vec![("Shoot".to_string(), Quantity::Goal(4))])
            .with_minutes(Some(3))
            .with_speed(Some(1.5))
            .with_seed(Some(1));
        let session = SessionHandle::from_config(&command.config);
        command.prepare(&session).await.unwrap();

        let names: Vec<String> = session
            .selected_moves()
            .await
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Shoot", "Sprawl", "Double Leg", "Snap", "Headlock"]);
        assert_eq!(session.workout_duration_minutes().await, 3);
        assert_eq!(session.playback_speed().await, 1.5);
        let shoot = session.read(|s| s.goal_progress(MoveId(1))).await;
        assert_eq!(shoot, Some((0, Quantity::Goal(4))));
    }

    #[tokio::test]
    async fn test_prepare_rejects_unknown_move_and_empty_selection() {
        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_moves(vec!["Suplex".to_string()]);
        let session = SessionHandle::from_config(&command.config);
        let err = command.prepare(&session).await.unwrap_err();
        assert!(err.to_string().contains("Unknown move 'Suplex'"));

        let empty = RunCommand::new(ShadowDrillConfig::default());
        let session = SessionHandle::from_config(&empty.config);
        assert!(empty.prepare(&session).await.is_err());
    }

    #[tokio::test]
    async fn test_prepare_rejects_out_of_range_settings() {
        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_moves(vec!["Shoot".to_string()])
            .with_speed(Some(3.0));
        let session = SessionHandle::from_config(&command.config);
        assert!(command.prepare(&session).await.is_err());

        let command = RunCommand::new(ShadowDrillConfig::default())
            .with_moves(vec!["Shoot".to_string()])
            .with_minutes(Some(0));
        let session = SessionHandle::from_config(&command.config);
        assert!(command.prepare(&session).await.is_err());
    }
}
