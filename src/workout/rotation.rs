//! Random move rotation
//!
//! Moves are drawn uniformly from the current selection. When more than one
//! move is selected, a draw that repeats the previous move is resampled at
//! most [`MAX_RESAMPLES`] times; after that the repeat is accepted. This keeps
//! every draw O(1) and means back-to-back repeats stay possible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use crate::moves::{Move, MoveId};

pub const MAX_RESAMPLES: u32 = 3;

/// Source of uniform indices in `0..len`
pub trait IndexSource: Send {
    fn draw(&mut self, len: usize) -> usize;
}

impl IndexSource for StdRng {
    fn draw(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

pub struct RotationPicker {
    source: Box<dyn IndexSource>,
}

impl std::fmt::Debug for RotationPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotationPicker").finish_non_exhaustive()
    }
}

impl RotationPicker {
    pub fn new(source: Box<dyn IndexSource>) -> Self {
        Self { source }
    }

    /// Seeded picker for reproducible workouts, OS entropy otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(Box::new(rng))
    }

    pub fn pick(&mut self, selected: &[Move], previous: Option<MoveId>) -> Option<Move> {
        if selected.is_empty() {
            return None;
        }

        let mut index = self.source.draw(selected.len());
        if let (true, Some(previous)) = (selected.len() > 1, previous) {
            let mut attempts = 0;
            while selected[index].id == previous && attempts < MAX_RESAMPLES {
                index = self.source.draw(selected.len());
                attempts += 1;
            }
        }
        Some(selected[index].clone())
    }
}

/// How long a move stays up at the given speed.
///
/// A non-positive or non-finite result is clamped to zero so the timer fires
/// at once instead of stalling the rotation.
pub fn hold_duration(duration_secs: u32, speed: f64) -> Duration {
    let secs = duration_secs as f64 / speed;
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f64(secs)
    } else {
        Duration::ZERO
    }
}

/// Hold time rounded to one decimal for display
pub fn hold_seconds(duration_secs: u32, speed: f64) -> f64 {
    (hold_duration(duration_secs, speed).as_secs_f64() * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays scripted indices and records how many were consumed
    pub(crate) struct ScriptedSource {
        pub script: VecDeque<usize>,
        pub draws: Arc<Mutex<u32>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(script: &[usize]) -> (Self, Arc<Mutex<u32>>) {
            let draws = Arc::new(Mutex::new(0));
            (
                Self {
                    script: script.iter().copied().collect(),
                    draws: draws.clone(),
                },
                draws,
            )
        }
    }

    impl IndexSource for ScriptedSource {
        fn draw(&mut self, len: usize) -> usize {
            *self.draws.lock().unwrap() += 1;
            self.script.pop_front().unwrap_or(0) % len
        }
    }

    fn moves() -> Vec<Move> {
        vec![Move::new(1, "Shoot", 3), Move::new(2, "Block", 2)]
    }

    #[test]
    fn test_pick_from_empty_selection() {
        let mut picker = RotationPicker::from_seed(Some(7));
        assert!(picker.pick(&[], None).is_none());
    }

    #[test]
    fn test_first_pick_does_not_resample() {
        let (source, draws) = ScriptedSource::new(&[0]);
        let mut picker = RotationPicker::new(Box::new(source));
        let picked = picker.pick(&moves(), None).unwrap();
        assert_eq!(picked.id, MoveId(1));
        assert_eq!(*draws.lock().unwrap(), 1);
    }

    #[test]
    fn test_resample_avoids_repeat() {
        let (source, draws) = ScriptedSource::new(&[0, 0, 1]);
        let mut picker = RotationPicker::new(Box::new(source));
        let picked = picker.pick(&moves(), Some(MoveId(1))).unwrap();
        assert_eq!(picked.id, MoveId(2));
        assert_eq!(*draws.lock().unwrap(), 3);
    }

    #[test]
    fn test_repeat_accepted_after_three_resamples() {
        let (source, draws) = ScriptedSource::new(&[0, 0, 0, 0, 1]);
        let mut picker = RotationPicker::new(Box::new(source));
        let picked = picker.pick(&moves(), Some(MoveId(1))).unwrap();
        assert_eq!(picked.id, MoveId(1));
        assert_eq!(*draws.lock().unwrap(), 1 + MAX_RESAMPLES);
    }

    #[test]
    fn test_single_move_repeats_without_resampling() {
        let (source, draws) = ScriptedSource::new(&[0, 0, 0]);
        let mut picker = RotationPicker::new(Box::new(source));
        let only = vec![Move::new(4, "Double Leg", 4)];
        assert_eq!(picker.pick(&only, Some(MoveId(4))).unwrap().id, MoveId(4));
        assert_eq!(*draws.lock().unwrap(), 1);
    }

    #[test]
    fn test_seeded_picker_is_reproducible() {
        let catalog = crate::moves::default_moves();
        let mut a = RotationPicker::from_seed(Some(42));
        let mut b = RotationPicker::from_seed(Some(42));
        let mut prev = None;
        for _ in 0..20 {
            let left = a.pick(&catalog, prev).unwrap();
            let right = b.pick(&catalog, prev).unwrap();
            assert_eq!(left.id, right.id);
            prev = Some(left.id);
        }
    }

    #[test]
    fn test_hold_duration_scales_with_speed() {
        assert_eq!(hold_duration(3, 1.0), Duration::from_secs(3));
        assert_eq!(hold_duration(3, 2.0), Duration::from_millis(1500));
        assert_eq!(hold_duration(2, 0.5), Duration::from_secs(4));
        assert_eq!(hold_duration(0, 1.0), Duration::ZERO);
        assert_eq!(hold_duration(3, 0.0), Duration::ZERO);
        assert_eq!(hold_duration(3, f64::NAN), Duration::ZERO);
        assert_eq!(hold_seconds(4, 1.5), 2.7);
    }
}
