use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts finished tiles; written by pool workers, read by the collector.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
}

impl ProgressCounter {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Records one finished tile and returns the new percentage.
    pub fn record_completion(&self) -> u8 {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        percent_of(completed, self.total)
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire).min(self.total)
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        percent_of(self.completed.load(Ordering::Acquire), self.total)
    }
}

fn percent_of(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }

    (completed.min(total) * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_percent_tracks_completions() {
        let progress = ProgressCounter::new(4);

        assert_eq!(progress.percent(), 0);
        assert_eq!(progress.record_completion(), 25);
        assert_eq!(progress.record_completion(), 50);
        assert_eq!(progress.record_completion(), 75);
        assert_eq!(progress.record_completion(), 100);
        assert_eq!(progress.completed(), 4);
    }

    #[test]
    fn test_percent_rounds_down() {
        let progress = ProgressCounter::new(3);

        assert_eq!(progress.record_completion(), 33);
        assert_eq!(progress.record_completion(), 66);
        assert_eq!(progress.record_completion(), 100);
    }

    #[test]
    fn test_percent_never_exceeds_100() {
        let progress = ProgressCounter::new(1);
        progress.record_completion();
        progress.record_completion();

        assert_eq!(progress.percent(), 100);
        assert_eq!(progress.completed(), 1);
    }

    #[test]
    fn test_empty_total_is_complete() {
        assert_eq!(ProgressCounter::new(0).percent(), 100);
    }

    #[test]
    fn test_concurrent_completions_are_all_counted() {
        let progress = Arc::new(ProgressCounter::new(800));

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let progress = Arc::clone(&progress);
                thread::spawn(move || {
                    for _ in 0..100 {
                        progress.record_completion();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(progress.completed(), 800);
        assert_eq!(progress.percent(), 100);
    }
}
