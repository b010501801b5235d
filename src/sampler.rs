use crate::timeline::CaptionTimeline;

use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Stand-in for the player's periodic position timer.
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    interval: Duration,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Sampler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Positions `0, i, 2i, ...` up to and including `duration` seconds.
    /// A negative or non-finite `duration` yields nothing.
    pub fn positions(&self, duration: f64) -> impl Iterator<Item = f64> {
        let step = self.interval.as_secs_f64();
        let count = if step > 0.0 && duration.is_finite() && duration >= 0.0 {
            // Tolerate float error so an exact multiple of the step is included.
            ((duration / step + 1e-9).floor() as usize).saturating_add(1)
        } else {
            0
        };
        (0..count).map(move |i| i as f64 * step)
    }
}

/// Feeds every position into `timeline`, calling `on_change` with the
/// position and new index whenever the active line changes. Returns the
/// number of changes.
pub fn drive<I, F>(timeline: &mut CaptionTimeline, positions: I, mut on_change: F) -> usize
where
    I: IntoIterator<Item = f64>,
    F: FnMut(f64, Option<usize>),
{
    let mut changes = 0;
    for position in positions {
        let update = timeline.update(position);
        if update.changed {
            changes += 1;
            on_change(position, update.index);
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_captions;

    #[test]
    fn positions_cover_duration() {
        let sampler = Sampler::new(Duration::from_millis(500));
        let positions: Vec<_> = sampler.positions(2.0).collect();
        assert_eq!(positions, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn default_interval_count() {
        assert_eq!(Sampler::default().positions(1.0).count(), 11);
        assert_eq!(Sampler::default().positions(-1.0).count(), 0);
        assert_eq!(Sampler::new(Duration::ZERO).positions(1.0).count(), 0);
    }

    #[test]
    fn unbounded_duration() {
        assert_eq!(Sampler::default().positions(f64::INFINITY).count(), 0);
        assert_eq!(Sampler::default().positions(f64::NAN).count(), 0);

        let first: Vec<_> = Sampler::new(Duration::from_secs(1))
            .positions(1e300)
            .take(3)
            .collect();
        assert_eq!(first, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn drive_reports_each_change_once() {
        let mut timeline = CaptionTimeline::new(parse_captions(
            "[00:00.50]a\n[00:01]b\n[00:01]c\n[00:02]d\n[00:02.50]",
        ));
        let mut seen = Vec::new();

        let changes = drive(
            &mut timeline,
            Sampler::new(Duration::from_millis(250)).positions(3.0),
            |_, index| seen.push(index),
        );

        assert_eq!(changes, 4);
        assert_eq!(seen, vec![Some(0), Some(2), Some(3), Some(4)]);
        assert_eq!(timeline.active_entry().map(|e| e.text.as_str()), Some(""));
    }

    #[test]
    fn drive_handles_backward_seek() {
        let mut timeline = CaptionTimeline::new(parse_captions("[00:01]a\n[00:05]b"));
        let mut seen = Vec::new();

        drive(&mut timeline, [6.0, 6.1, 2.0, 0.0], |p, index| seen.push((p, index)));

        assert_eq!(seen, vec![(6.0, Some(1)), (2.0, Some(0)), (0.0, None)]);
    }
}
