//! Stage-boundary progress reporting.
//!
//! The timer is an explicit object owned by the orchestrator; each
//! checkpoint records and returns the elapsed time since the previous
//! one instead of mutating ambient state.

use std::fmt;
use std::time::{Duration, Instant};

/// Pipeline stage boundaries, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Chapters,
    PageUrls,
    Download,
    Clustering,
    BarGeneration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Chapters => "chapter discovery",
            Stage::PageUrls => "url collection",
            Stage::Download => "download",
            Stage::Clustering => "clustering",
            Stage::BarGeneration => "bar generation",
        };
        write!(f, "{name}")
    }
}

/// Elapsed-time tracker for stage boundaries.
#[derive(Debug)]
pub struct StageTimer {
    last: Instant,
}

impl StageTimer {
    /// Start the timer at the beginning of a run.
    pub fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Record a stage boundary: log the elapsed time since the previous
    /// checkpoint, reset, and return the duration.
    pub fn checkpoint(&mut self, stage: Stage) -> Duration {
        let elapsed = self.last.elapsed();
        self.last = Instant::now();
        tracing::info!(
            stage = %stage,
            elapsed_ms = elapsed.as_millis() as u64,
            "stage complete"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Chapters.to_string(), "chapter discovery");
        assert_eq!(Stage::PageUrls.to_string(), "url collection");
        assert_eq!(Stage::Download.to_string(), "download");
        assert_eq!(Stage::Clustering.to_string(), "clustering");
        assert_eq!(Stage::BarGeneration.to_string(), "bar generation");
    }

    #[test]
    fn test_checkpoint_resets_between_stages() {
        let mut timer = StageTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        let first = timer.checkpoint(Stage::Chapters);
        let second = timer.checkpoint(Stage::PageUrls);

        assert!(first >= Duration::from_millis(10));
        // The second checkpoint measures from the first, not from start.
        assert!(second < first);
    }
}
