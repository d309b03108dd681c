//! Progress reporting for similarity computation.

/// Receives progress notifications from worker threads.
///
/// Notifications may arrive from any worker and out of order; `completed` is
/// a snapshot of a shared counter, not a strictly increasing sequence.
pub trait ProgressObserver: Send + Sync {
    /// Called periodically with the number of scored pairs so far.
    fn on_progress(&self, completed: usize, total: usize);

    /// Called once after every pair has been scored.
    fn on_complete(&self, total: usize) {
        self.on_progress(total, total);
    }
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Observer that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Observer that forwards progress to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        log::debug!("Progress: {:.2}%", percentage(completed, total));
    }

    fn on_complete(&self, total: usize) {
        log::info!("Scored {total} word pairs");
    }
}

/// Completion percentage, treating an empty workload as done.
pub fn percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_closure_observer() {
        let last = AtomicUsize::new(0);
        let observer = |completed: usize, _total: usize| {
            last.store(completed, Ordering::SeqCst);
        };

        observer.on_progress(10, 100);
        assert_eq!(last.load(Ordering::SeqCst), 10);

        observer.on_complete(100);
        assert_eq!(last.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 100.0);
        assert_eq!(percentage(25, 100), 25.0);
    }
}
