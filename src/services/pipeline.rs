//! Pipeline orchestration.
//!
//! Runs the stages of a scan over a bounded worker pool: chapter
//! discovery, URL collection, download+decode, color extraction, bar
//! generation, final assembly. Every parallel stage tags its jobs with a
//! sequence index and collects results into index-addressed slots, so
//! the final grid order always matches discovery order no matter which
//! worker finishes first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use dominant_color::{
    render_bar, BarLayout, ColorBlacklist, ColorExtractor, OutputGrid, PixelBuffer, Rgb,
};

use crate::error::{PageError, PipelineError};
use crate::models::{FailurePolicy, RunConfig};
use crate::services::progress::{Stage, StageTimer};
use crate::services::scrape::PageProvider;

/// Attempt cap for the Retry policy. The original tool re-prompted the
/// operator indefinitely; unattended runs need a bound, after which the
/// page is skipped with a warning.
const MAX_ATTEMPTS: usize = 3;

/// Outcome of one page under the configured failure policy.
enum PageOutcome<T> {
    Done(T),
    Dropped,
    Failed(PageError),
}

/// Drives the full scan and assembles the output grid.
#[derive(Debug)]
pub struct Pipeline {
    workers: usize,
    policy: FailurePolicy,
    extractor: ColorExtractor,
    layout: BarLayout,
}

impl Pipeline {
    /// Build a pipeline from a run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self, PipelineError> {
        let blacklist = ColorBlacklist::new(&config.blacklist_colors()?);
        let mut extractor = ColorExtractor::new(config.num_colors)
            .tweak(config.tweak)
            .blacklist(blacklist);
        if let Some(seed) = config.seed {
            extractor = extractor.seed(seed);
        }

        Ok(Self {
            workers: config.workers.max(1),
            policy: config.on_error,
            extractor,
            layout: BarLayout::new(config.num_colors, config.col_width, config.bar_thickness),
        })
    }

    /// Output grid width implied by the configured bar layout.
    pub fn output_width(&self) -> usize {
        self.layout.output_width()
    }

    /// Run the whole pipeline against a page provider.
    ///
    /// Returns the assembled grid, or the first fatal error: a scrape
    /// failure, a page failure under the Abort policy, or an empty
    /// result when no page produced a bar.
    pub fn run<P: PageProvider>(&self, provider: &P) -> Result<OutputGrid, PipelineError> {
        let mut timer = StageTimer::start();

        // Stage 1: chapter discovery.
        let chapters = provider.chapters()?;
        tracing::info!(chapters = chapters.len(), "discovered chapters");
        timer.checkpoint(Stage::Chapters);

        // Stage 2: URL collection, parallel over chapters. Chapter-level
        // scrape failures are fatal; the failure policy is per-page only.
        let url_lists = par_map(self.workers, chapters, None, |_, chapter| {
            provider.page_urls(&chapter)
        });
        let mut urls = Vec::new();
        for list in url_lists.into_iter().flatten() {
            urls.extend(list?);
        }
        tracing::info!(pages = urls.len(), "collected page urls");
        timer.checkpoint(Stage::PageUrls);

        // Stage 3: download + decode, parallel over pages.
        let abort = AtomicBool::new(false);
        let downloads = par_map(self.workers, urls, Some(&abort), |index, url| {
            self.download_page(provider, index, &url, &abort)
        });
        let mut pages: Vec<(usize, PixelBuffer)> = Vec::new();
        for (index, slot) in downloads.into_iter().enumerate() {
            match slot {
                Some(PageOutcome::Done(pixels)) => pages.push((index, pixels)),
                Some(PageOutcome::Failed(source)) => {
                    return Err(PipelineError::Page { index, source });
                }
                Some(PageOutcome::Dropped) | None => {}
            }
        }
        tracing::info!(pages = pages.len(), "downloaded pages");
        timer.checkpoint(Stage::Download);

        // Stage 4: color extraction, parallel over downloaded pages.
        let abort = AtomicBool::new(false);
        let extractions = par_map(
            self.workers,
            pages,
            Some(&abort),
            |_, (page_index, pixels)| (page_index, self.extract_page(page_index, &pixels, &abort)),
        );
        let mut ranked: Vec<(usize, Vec<Rgb>)> = Vec::new();
        for (page_index, outcome) in extractions.into_iter().flatten() {
            match outcome {
                PageOutcome::Done(colors) => ranked.push((page_index, colors)),
                PageOutcome::Failed(source) => {
                    return Err(PipelineError::Page {
                        index: page_index,
                        source,
                    });
                }
                PageOutcome::Dropped => {}
            }
        }
        timer.checkpoint(Stage::Clustering);

        // Stage 5: bar generation and assembly, in original page order.
        // The slots above are index-addressed, so `ranked` is already
        // sorted by page index.
        let mut grid = OutputGrid::new(self.layout.output_width());
        for (_, colors) in &ranked {
            let bar = render_bar(colors, &self.layout)?;
            grid.push_bar(bar)?;
        }
        timer.checkpoint(Stage::BarGeneration);

        if grid.is_empty() {
            return Err(PipelineError::EmptyResult);
        }
        Ok(grid)
    }

    fn download_page<P: PageProvider>(
        &self,
        provider: &P,
        index: usize,
        url: &str,
        abort: &AtomicBool,
    ) -> PageOutcome<PixelBuffer> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match provider.fetch_page(url) {
                Ok(Some(pixels)) => return PageOutcome::Done(pixels),
                Ok(None) => {
                    // Non-color or undecodable image: not a failure.
                    tracing::debug!(page = index, "dropped non-color page");
                    return PageOutcome::Dropped;
                }
                Err(e) => match self.policy {
                    FailurePolicy::Retry if attempt < MAX_ATTEMPTS => {
                        tracing::warn!(page = index, attempt, %e, "download failed, retrying");
                    }
                    FailurePolicy::Retry | FailurePolicy::Skip => {
                        tracing::warn!(page = index, %e, "download failed, skipping page");
                        return PageOutcome::Dropped;
                    }
                    FailurePolicy::Abort => {
                        abort.store(true, Ordering::Relaxed);
                        return PageOutcome::Failed(e.into());
                    }
                },
            }
        }
    }

    fn extract_page(
        &self,
        index: usize,
        pixels: &[Rgb],
        abort: &AtomicBool,
    ) -> PageOutcome<Vec<Rgb>> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.extractor.extract(pixels) {
                Ok(colors) => return PageOutcome::Done(colors),
                Err(e) => match self.policy {
                    FailurePolicy::Retry if attempt < MAX_ATTEMPTS => {
                        tracing::warn!(page = index, attempt, %e, "clustering failed, retrying");
                    }
                    FailurePolicy::Retry | FailurePolicy::Skip => {
                        tracing::warn!(page = index, %e, "clustering failed, skipping page");
                        return PageOutcome::Dropped;
                    }
                    FailurePolicy::Abort => {
                        abort.store(true, Ordering::Relaxed);
                        return PageOutcome::Failed(e.into());
                    }
                },
            }
        }
    }
}

/// Map `f` over index-tagged items on a fixed-size worker pool.
///
/// Results come back in index-addressed slots, so output order equals
/// input order regardless of completion order. When `abort` is raised
/// mid-run, in-flight jobs complete and remaining slots stay `None`.
fn par_map<T, R, F>(workers: usize, items: Vec<T>, abort: Option<&AtomicBool>, f: F) -> Vec<Option<R>>
where
    T: Send,
    R: Send,
    F: Fn(usize, T) -> R + Sync,
{
    let total = items.len();
    let jobs = Mutex::new(items.into_iter().enumerate());
    let (tx, rx) = mpsc::channel();

    thread::scope(|s| {
        for _ in 0..workers.max(1) {
            let tx = tx.clone();
            let jobs = &jobs;
            let f = &f;
            s.spawn(move || loop {
                if abort.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    break;
                }
                let job = jobs.lock().unwrap().next();
                let Some((index, item)) = job else { break };
                if tx.send((index, f(index, item))).is_err() {
                    break;
                }
            });
        }
        drop(tx);
    });

    let mut slots: Vec<Option<R>> = (0..total).map(|_| None).collect();
    for (index, result) in rx {
        slots[index] = Some(result);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_par_map_preserves_input_order() {
        // Jobs finish out of order (larger inputs sleep longer reversed),
        // results must still come back slot-ordered.
        let items: Vec<u64> = (0..16).collect();
        let results = par_map(4, items, None, |_, n| {
            std::thread::sleep(std::time::Duration::from_millis(16 - n));
            n * 10
        });

        let flattened: Vec<u64> = results.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(flattened, (0..16).map(|n| n * 10).collect::<Vec<u64>>());
    }

    #[test]
    fn test_par_map_single_worker() {
        let results = par_map(1, vec![1, 2, 3], None, |index, n| index + n);
        assert_eq!(results, vec![Some(1), Some(3), Some(5)]);
    }

    #[test]
    fn test_par_map_abort_leaves_remaining_slots_empty() {
        let abort = AtomicBool::new(false);
        let results = par_map(1, (0..8).collect(), Some(&abort), |index, n: usize| {
            if index == 2 {
                abort.store(true, Ordering::Relaxed);
            }
            n
        });

        // Jobs after the abort point were never taken.
        assert_eq!(results[0], Some(0));
        assert_eq!(results[2], Some(2));
        assert!(results[3..].iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn test_par_map_empty_input() {
        let results: Vec<Option<u32>> = par_map(4, Vec::<u32>::new(), None, |_, n| n);
        assert!(results.is_empty());
    }
}
