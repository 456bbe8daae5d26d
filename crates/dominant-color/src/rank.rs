//! Dominant-color ranking over a clustering result.
//!
//! Selection and ordering are two separate sorts on purpose: the top-N
//! clusters are chosen by pixel-membership count (frequency), but the
//! chosen set is then reordered purely by descending brightness, so the
//! final bar reads light-to-dark rather than most-to-least frequent.
//! A single combined sort would look more natural but changes the output
//! order; this two-stage behavior is intentional and load-bearing.

use crate::cluster::ClusterResult;
use crate::color::Rgb;
use crate::error::ExtractError;

/// Select the `num_colors` dominant colors from a clustering result.
///
/// Clusters are ranked by membership count descending; count ties break
/// by descending average-channel brightness of the (unrounded) center,
/// residual ties by raw channel values so a permutation of the input
/// clusters can never change the output. The selected centers are then
/// re-sorted purely by descending brightness and truncated to 8-bit RGB.
///
/// Fails with [`ExtractError::InsufficientClusters`] when fewer than
/// `num_colors` clusters have any members, which happens on near-uniform
/// or degenerate pages.
pub fn rank_dominant(
    clusters: &ClusterResult,
    num_colors: usize,
) -> Result<Vec<Rgb>, ExtractError> {
    let mut counts = vec![0usize; clusters.k()];
    for &index in clusters.assignments() {
        counts[index] += 1;
    }

    let mut candidates: Vec<usize> = (0..clusters.k()).filter(|&i| counts[i] > 0).collect();
    if candidates.len() < num_colors {
        return Err(ExtractError::InsufficientClusters {
            found: candidates.len(),
            requested: num_colors,
        });
    }

    let centers = clusters.centers();

    // Stage one: pick the top-N by frequency.
    candidates.sort_by(|&a, &b| {
        counts[b]
            .cmp(&counts[a])
            .then_with(|| total_cmp_desc(brightness(&centers[a]), brightness(&centers[b])))
            .then_with(|| channels_desc(&centers[a], &centers[b]))
    });
    candidates.truncate(num_colors);

    // Stage two: reorder the chosen set by brightness alone, discarding
    // the frequency order entirely.
    candidates.sort_by(|&a, &b| {
        total_cmp_desc(brightness(&centers[a]), brightness(&centers[b]))
            .then_with(|| channels_desc(&centers[a], &centers[b]))
    });

    Ok(candidates
        .into_iter()
        .map(|i| truncate_to_rgb(&centers[i]))
        .collect())
}

/// Mean of the three float channels, unrounded.
#[inline]
fn brightness(center: &[f32; 3]) -> f32 {
    (center[0] + center[1] + center[2]) / 3.0
}

#[inline]
fn total_cmp_desc(a: f32, b: f32) -> std::cmp::Ordering {
    b.total_cmp(&a)
}

#[inline]
fn channels_desc(a: &[f32; 3], b: &[f32; 3]) -> std::cmp::Ordering {
    b.iter()
        .zip(a.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(std::cmp::Ordering::Equal)
}

/// Truncate (not round) a float center to 8-bit RGB. Truncation matches
/// the behavior of an integer down-cast and is the only point where
/// centers leave floating point.
#[inline]
fn truncate_to_rgb(center: &[f32; 3]) -> Rgb {
    Rgb::new(
        center[0].clamp(0.0, 255.0) as u8,
        center[1].clamp(0.0, 255.0) as u8,
        center[2].clamp(0.0, 255.0) as u8,
    )
}
