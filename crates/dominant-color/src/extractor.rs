//! ColorExtractor builder -- the primary ergonomic entry point for the
//! crate.
//!
//! [`ColorExtractor`] wraps the per-page pipeline (mask, cluster, rank)
//! behind a fluent builder with the defaults the comic color-map tool
//! uses.

use crate::bar::{render_bar, BarLayout, ColorBar};
use crate::cluster::{kmeans, ClusterOptions};
use crate::color::Rgb;
use crate::error::ExtractError;
use crate::mask::ColorBlacklist;
use crate::rank::rank_dominant;

/// Default slack added to the cluster count above the requested number
/// of dominant colors. The extra clusters give the ranking stage more
/// granularity than strictly needed, improving color separation.
pub const DEFAULT_TWEAK: usize = 2;

/// High-level dominant-color extractor.
///
/// # Design
///
/// - Constructor takes the requested dominant-color count
/// - Configuration methods consume and return `self` (standard builder
///   pattern)
/// - [`extract()`](Self::extract) takes `&self` so one configured
///   extractor is reusable across every page of a run
///
/// # Example
///
/// ```
/// use dominant_color::{ColorBlacklist, ColorExtractor, Rgb};
///
/// let extractor = ColorExtractor::new(2)
///     .blacklist(ColorBlacklist::new(&[Rgb::new(0, 0, 0)]))
///     .seed(7);
///
/// let mut pixels = vec![Rgb::new(200, 40, 40); 60];
/// pixels.extend(vec![Rgb::new(40, 40, 200); 40]);
/// pixels.extend(vec![Rgb::new(0, 0, 0); 500]); // masked out
///
/// let colors = extractor.extract(&pixels).unwrap();
/// assert_eq!(colors.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ColorExtractor {
    num_colors: usize,
    tweak: usize,
    blacklist: ColorBlacklist,
    options: ClusterOptions,
}

impl ColorExtractor {
    /// Create an extractor returning `num_colors` dominant colors per
    /// page, with the default tweak of 2 and an empty blacklist.
    pub fn new(num_colors: usize) -> Self {
        Self {
            num_colors,
            tweak: DEFAULT_TWEAK,
            blacklist: ColorBlacklist::default(),
            options: ClusterOptions::default(),
        }
    }

    /// Set the colors removed before clustering.
    #[inline]
    pub fn blacklist(mut self, blacklist: ColorBlacklist) -> Self {
        self.blacklist = blacklist;
        self
    }

    /// Set the cluster-count slack above `num_colors`. Zero produces a
    /// less vibrant output.
    #[inline]
    pub fn tweak(mut self, tweak: usize) -> Self {
        self.tweak = tweak;
        self
    }

    /// Fix the clustering RNG seed for reproducible runs.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options = self.options.seed(seed);
        self
    }

    /// Set the number of clustering restarts.
    #[inline]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.options = self.options.attempts(attempts);
        self
    }

    /// Set the per-restart iteration cap.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.options = self.options.max_iterations(max_iterations);
        self
    }

    /// Set the clustering convergence threshold.
    #[inline]
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.options = self.options.epsilon(epsilon);
        self
    }

    /// Requested dominant-color count.
    pub fn num_colors(&self) -> usize {
        self.num_colors
    }

    /// Run mask, cluster and rank over one page's pixels.
    ///
    /// Returns exactly `num_colors` colors, ordered brightest first.
    pub fn extract(&self, pixels: &[Rgb]) -> Result<Vec<Rgb>, ExtractError> {
        let kept = self.blacklist.apply(pixels);
        let k = self.num_colors + self.tweak;
        let clusters = kmeans(&kept, k, &self.options)?;
        rank_dominant(&clusters, self.num_colors)
    }

    /// Extract and rasterize in one step.
    pub fn extract_bar(
        &self,
        pixels: &[Rgb],
        col_width: usize,
        thickness: usize,
    ) -> Result<ColorBar, ExtractError> {
        let colors = self.extract(pixels)?;
        let layout = BarLayout::new(self.num_colors, col_width, thickness);
        render_bar(&colors, &layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone_page() -> Vec<Rgb> {
        let mut pixels = vec![Rgb::new(220, 30, 30); 300];
        pixels.extend(vec![Rgb::new(30, 30, 220); 200]);
        pixels
    }

    #[test]
    fn test_extract_returns_num_colors() {
        let extractor = ColorExtractor::new(2).seed(3);
        let colors = extractor.extract(&two_tone_page()).unwrap();
        assert_eq!(colors.len(), 2);
    }

    #[test]
    fn test_extractor_is_reusable_and_deterministic() {
        let extractor = ColorExtractor::new(2).seed(3);
        let pixels = two_tone_page();

        let a = extractor.extract(&pixels).unwrap();
        let b = extractor.extract(&pixels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fully_blacklisted_page_fails() {
        let extractor = ColorExtractor::new(2)
            .blacklist(ColorBlacklist::new(&[Rgb::new(5, 5, 5)]))
            .seed(3);
        let pixels = vec![Rgb::new(5, 5, 5); 400];

        let err = extractor.extract(&pixels).unwrap_err();
        assert!(matches!(err, ExtractError::InsufficientPixels { .. }));
    }

    #[test]
    fn test_extract_bar_dimensions() {
        let extractor = ColorExtractor::new(2).seed(3);
        let bar = extractor.extract_bar(&two_tone_page(), 50, 4).unwrap();

        assert_eq!(bar.width(), 100);
        assert_eq!(bar.height(), 4);
    }
}
