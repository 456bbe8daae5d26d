//! Blacklist masking -- removes exact-match pixels before clustering.
//!
//! Dropping pure black, pure white and the speech-bubble fill color
//! before clustering keeps page backgrounds and lettering from dominating
//! the extracted palette.

use crate::color::Rgb;

/// A set of exact RGB triples to exclude from clustering.
///
/// Membership is exact-match only; there is no tolerance radius.
/// Duplicates in the input are collapsed. Order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorBlacklist {
    colors: Vec<Rgb>,
}

impl ColorBlacklist {
    /// Create a blacklist from a list of colors.
    pub fn new(colors: &[Rgb]) -> Self {
        let mut deduped: Vec<Rgb> = Vec::with_capacity(colors.len());
        for &color in colors {
            if !deduped.contains(&color) {
                deduped.push(color);
            }
        }
        Self { colors: deduped }
    }

    /// Whether the blacklist contains no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of distinct blacklisted colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Exact-match membership test.
    #[inline]
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Return a new pixel buffer with every blacklisted pixel removed.
    ///
    /// The relative order of surviving pixels is preserved. An empty
    /// result (all pixels blacklisted) is valid; the clustering stage
    /// reports it as `InsufficientPixels`.
    pub fn apply(&self, pixels: &[Rgb]) -> Vec<Rgb> {
        if self.colors.is_empty() {
            return pixels.to_vec();
        }
        pixels
            .iter()
            .copied()
            .filter(|p| !self.contains(*p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_removes_only_exact_matches() {
        let blacklist = ColorBlacklist::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]);
        let pixels = vec![
            Rgb::new(0, 0, 0),
            Rgb::new(1, 0, 0), // off by one, must survive
            Rgb::new(255, 255, 255),
            Rgb::new(254, 255, 255),
        ];

        let kept = blacklist.apply(&pixels);
        assert_eq!(kept, vec![Rgb::new(1, 0, 0), Rgb::new(254, 255, 255)]);
    }

    #[test]
    fn test_apply_preserves_order() {
        let blacklist = ColorBlacklist::new(&[Rgb::new(9, 9, 9)]);
        let pixels = vec![
            Rgb::new(3, 0, 0),
            Rgb::new(9, 9, 9),
            Rgb::new(1, 0, 0),
            Rgb::new(2, 0, 0),
        ];

        let kept = blacklist.apply(&pixels);
        assert_eq!(
            kept,
            vec![Rgb::new(3, 0, 0), Rgb::new(1, 0, 0), Rgb::new(2, 0, 0)]
        );
    }

    #[test]
    fn test_apply_empty_result_is_valid() {
        let blacklist = ColorBlacklist::new(&[Rgb::new(7, 7, 7)]);
        let pixels = vec![Rgb::new(7, 7, 7); 100];

        assert!(blacklist.apply(&pixels).is_empty());
    }

    #[test]
    fn test_empty_blacklist_keeps_everything() {
        let blacklist = ColorBlacklist::default();
        let pixels = vec![Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)];

        assert_eq!(blacklist.apply(&pixels), pixels);
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let blacklist = ColorBlacklist::new(&[Rgb::new(0, 0, 0), Rgb::new(0, 0, 0)]);
        assert_eq!(blacklist.len(), 1);
    }

    #[test]
    fn test_every_kept_pixel_existed_in_input() {
        let blacklist = ColorBlacklist::new(&[Rgb::new(10, 20, 30)]);
        let pixels: Vec<Rgb> = (0..50).map(|i| Rgb::new(i, i * 2, i * 3)).collect();

        let kept = blacklist.apply(&pixels);
        for pixel in &kept {
            assert!(pixels.contains(pixel));
            assert!(!blacklist.contains(*pixel));
        }
    }
}
