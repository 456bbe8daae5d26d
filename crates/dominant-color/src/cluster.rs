//! K-means clustering over pixel colors in RGB space.
//!
//! Reproduces the classic restart-and-refine scheme: random centers,
//! iterative assignment/mean refinement until the centers stop moving
//! (or an iteration cap is hit), repeated for a number of attempts with
//! the lowest-distortion result kept.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::error::ExtractError;

/// Tuning parameters for [`kmeans`].
///
/// The defaults mirror the usual termination criteria for this kind of
/// palette extraction: epsilon 1.0, at most 10 refinement iterations,
/// 10 random restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    /// Number of random restarts; the lowest-distortion run wins.
    pub attempts: usize,
    /// Maximum refinement iterations per attempt.
    pub max_iterations: usize,
    /// Convergence threshold on the largest center movement (RGB distance).
    pub epsilon: f32,
    /// Fixed RNG seed for reproducible runs; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            attempts: 10,
            max_iterations: 10,
            epsilon: 1.0,
            seed: None,
        }
    }
}

impl ClusterOptions {
    /// Create options with the default termination criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of random restarts.
    #[inline]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the per-attempt iteration cap.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold.
    #[inline]
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Fix the RNG seed so repeated runs are byte-identical.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Result of a clustering run: K floating-point centers and a parallel
/// assignment of every input pixel to one center index.
///
/// Centers stay floating point here; they are truncated to 8-bit values
/// only when the ranking stage converts them to output colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterResult {
    centers: Vec<[f32; 3]>,
    assignments: Vec<usize>,
}

impl ClusterResult {
    /// Build a result from raw parts. Every assignment index must be in
    /// `0..centers.len()`.
    pub fn new(centers: Vec<[f32; 3]>, assignments: Vec<usize>) -> Self {
        debug_assert!(assignments.iter().all(|&i| i < centers.len()));
        Self {
            centers,
            assignments,
        }
    }

    /// The K candidate center colors.
    pub fn centers(&self) -> &[[f32; 3]] {
        &self.centers
    }

    /// Per-pixel center indices, parallel to the clustered input.
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Number of centers (K).
    pub fn k(&self) -> usize {
        self.centers.len()
    }
}

/// Cluster `pixels` into exactly `k` groups.
///
/// Fails with [`ExtractError::InsufficientPixels`] when fewer pixels than
/// `k` remain -- `k` centers cannot be initialized from fewer samples.
/// This covers the fully-blacklisted (empty) case.
pub fn kmeans(
    pixels: &[Rgb],
    k: usize,
    options: &ClusterOptions,
) -> Result<ClusterResult, ExtractError> {
    if pixels.len() < k || k == 0 {
        return Err(ExtractError::InsufficientPixels {
            available: pixels.len(),
            required: k,
        });
    }

    let points: Vec<[f32; 3]> = pixels
        .iter()
        .map(|p| [p.r as f32, p.g as f32, p.b as f32])
        .collect();

    let mut master = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut best: Option<(f64, Vec<[f32; 3]>, Vec<usize>)> = None;
    for _ in 0..options.attempts.max(1) {
        // Each attempt gets its own RNG derived from the master stream so
        // a fixed seed reproduces the full restart sequence.
        let mut rng = StdRng::seed_from_u64(master.gen());
        let (centers, assignments, distortion) = refine(&points, k, options, &mut rng);

        if best.as_ref().map_or(true, |(d, _, _)| distortion < *d) {
            best = Some((distortion, centers, assignments));
        }
    }

    let (_, centers, assignments) = best.expect("at least one clustering attempt runs");
    Ok(ClusterResult::new(centers, assignments))
}

/// One restart: random initial centers, then iterative refinement.
/// Returns the converged centers, final assignments and total distortion
/// (sum of squared distances to the assigned center).
fn refine(
    points: &[[f32; 3]],
    k: usize,
    options: &ClusterOptions,
    rng: &mut StdRng,
) -> (Vec<[f32; 3]>, Vec<usize>, f64) {
    // Sample k distinct pixel positions as the initial centers.
    let mut centers: Vec<[f32; 3]> = points.choose_multiple(rng, k).copied().collect();
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..options.max_iterations.max(1) {
        assign(points, &centers, &mut assignments);

        // Recompute each center as the mean of its members; a cluster
        // that lost all members keeps its previous position.
        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(&assignments) {
            sums[cluster][0] += point[0] as f64;
            sums[cluster][1] += point[1] as f64;
            sums[cluster][2] += point[2] as f64;
            counts[cluster] += 1;
        }

        let mut max_shift = 0.0f32;
        for (i, center) in centers.iter_mut().enumerate() {
            if counts[i] == 0 {
                continue;
            }
            let n = counts[i] as f64;
            let updated = [
                (sums[i][0] / n) as f32,
                (sums[i][1] / n) as f32,
                (sums[i][2] / n) as f32,
            ];
            max_shift = max_shift.max(distance_sq(center, &updated).sqrt());
            *center = updated;
        }

        if max_shift <= options.epsilon {
            break;
        }
    }

    // Final assignment against the converged centers.
    assign(points, &centers, &mut assignments);
    let distortion = points
        .iter()
        .zip(&assignments)
        .map(|(point, &cluster)| distance_sq(point, &centers[cluster]) as f64)
        .sum();

    (centers, assignments, distortion)
}

/// Assign every point to its nearest center by Euclidean RGB distance.
/// Ties go to the lower center index.
fn assign(points: &[[f32; 3]], centers: &[[f32; 3]], assignments: &mut [usize]) {
    for (point, slot) in points.iter().zip(assignments.iter_mut()) {
        let mut best_index = 0usize;
        let mut best_dist = f32::INFINITY;
        for (index, center) in centers.iter().enumerate() {
            let dist = distance_sq(point, center);
            if dist < best_dist {
                best_dist = dist;
                best_index = index;
            }
        }
        *slot = best_index;
    }
}

#[inline]
fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_blobs() -> Vec<Rgb> {
        let mut pixels = Vec::new();
        pixels.extend(std::iter::repeat(Rgb::new(250, 10, 10)).take(300));
        pixels.extend(std::iter::repeat(Rgb::new(10, 250, 10)).take(200));
        pixels.extend(std::iter::repeat(Rgb::new(10, 10, 250)).take(100));
        pixels
    }

    #[test]
    fn test_returns_exactly_k_centers() {
        let result = kmeans(&three_blobs(), 5, &ClusterOptions::new().seed(1)).unwrap();
        assert_eq!(result.k(), 5);
        assert_eq!(result.centers().len(), 5);
    }

    #[test]
    fn test_assignment_covers_every_pixel() {
        let pixels = three_blobs();
        let result = kmeans(&pixels, 5, &ClusterOptions::new().seed(1)).unwrap();
        assert_eq!(result.assignments().len(), pixels.len());
        for &index in result.assignments() {
            assert!(index < result.k());
        }
    }

    #[test]
    fn test_empty_input_is_insufficient_pixels() {
        let err = kmeans(&[], 5, &ClusterOptions::new()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::InsufficientPixels {
                available: 0,
                required: 5,
            }
        );
    }

    #[test]
    fn test_fewer_pixels_than_clusters_is_insufficient_pixels() {
        let pixels = vec![Rgb::new(1, 2, 3); 4];
        let err = kmeans(&pixels, 5, &ClusterOptions::new()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::InsufficientPixels {
                available: 4,
                required: 5,
            }
        );
    }

    #[test]
    fn test_seed_makes_run_deterministic() {
        let pixels = three_blobs();
        let options = ClusterOptions::new().seed(42);
        let a = kmeans(&pixels, 5, &options).unwrap();
        let b = kmeans(&pixels, 5, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_separates_well_spaced_blobs() {
        // Three far-apart colors with k=5 and 10 restarts: the winning
        // attempt reaches zero distortion, so each blob sits exactly on
        // its own center.
        let pixels = three_blobs();
        let result = kmeans(&pixels, 5, &ClusterOptions::new().seed(7)).unwrap();

        let mut counts = vec![0usize; result.k()];
        for &index in result.assignments() {
            counts[index] += 1;
        }
        let mut non_empty: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();
        non_empty.sort_unstable();
        assert_eq!(non_empty, vec![100, 200, 300]);
    }
}
