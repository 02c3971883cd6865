//! Batch progress reporting
//!

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;

/// Progress is logged at each multiple of this percentage
const LOG_TICK_PERCENT: u64 = 5;

/// Get the highest log tick percentage reached when progress moves from `prev_pos` to `pos`
///
/// Returns None if no new tick was crossed.
///
fn get_crossed_tick(prev_pos: u64, pos: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let tick = |x: u64| (x.min(total) * 100 / total) / LOG_TICK_PERCENT;
    let (prev_tick, new_tick) = (tick(prev_pos), tick(pos));
    if new_tick > prev_tick {
        Some(new_tick * LOG_TICK_PERCENT)
    } else {
        None
    }
}

/// Report progress over a known number of work items
///
/// A progress bar is drawn on stderr when it is a terminal. Progress is also written to the log
/// at every 5% tick whenever the bar is hidden, or when periodic log updates are forced.
///
pub struct ProgressReporter {
    bar: ProgressBar,
    total: u64,
    pos: u64,
    verb: String,
    noun: String,
    log_ticks: bool,
}

impl ProgressReporter {
    pub fn new(total: u64, verb: &str, noun: &str, force_periodic_updates: bool) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
        let template = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        bar.set_style(
            ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(noun.to_string());
        let log_ticks = force_periodic_updates || bar.is_hidden();
        Self {
            bar,
            total,
            pos: 0,
            verb: verb.to_string(),
            noun: noun.to_string(),
            log_ticks,
        }
    }

    pub fn inc(&mut self, count: u64) {
        let prev_pos = self.pos;
        self.pos += count;
        self.bar.inc(count);

        if self.log_ticks {
            if let Some(percent) = get_crossed_tick(prev_pos, self.pos, self.total) {
                self.bar.suspend(|| {
                    info!(
                        "{} {} of {} {} ({percent}%)",
                        self.verb,
                        self.pos.min(self.total),
                        self.total,
                        self.noun
                    )
                });
            }
        }
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_crossed_tick() {
        assert_eq!(get_crossed_tick(0, 1, 20), Some(5));
        assert_eq!(get_crossed_tick(0, 1, 40), None);
        assert_eq!(get_crossed_tick(1, 2, 40), Some(5));
        assert_eq!(get_crossed_tick(0, 3, 3), Some(100));
        assert_eq!(get_crossed_tick(2, 3, 3), Some(100));
        assert_eq!(get_crossed_tick(3, 4, 3), None);
        assert_eq!(get_crossed_tick(0, 1, 0), None);
    }

    #[test]
    fn test_forced_progress_updates() {
        let mut progress = ProgressReporter::new(3, "Processed", "alt loci", true);
        progress.inc(1);
        progress.inc(2);
        assert_eq!(progress.pos, 3);
        progress.clear();
    }
}
