//! dominant-color: per-image dominant-color extraction.
//!
//! This library implements the color-extraction core of the comic
//! color-map pipeline: masking out blacklisted colors, k-means
//! clustering of the remaining pixels, frequency/brightness ranking of
//! the cluster centers, and rasterization of the ranked colors into a
//! fixed-size bar.
//!
//! # Quick Start
//!
//! The [`ColorExtractor`] builder is the primary entry point:
//!
//! ```
//! use dominant_color::{ColorBlacklist, ColorExtractor, Rgb};
//!
//! let extractor = ColorExtractor::new(2)
//!     .blacklist(ColorBlacklist::new(&[Rgb::new(255, 255, 255)]))
//!     .seed(42);
//!
//! let mut page = vec![Rgb::new(200, 60, 20); 500];
//! page.extend(vec![Rgb::new(20, 60, 200); 300]);
//!
//! let colors = extractor.extract(&page).unwrap();
//! assert_eq!(colors.len(), 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer                    (decoded page, row-major RGB)
//!     |
//!     v
//! ColorBlacklist::apply          (exact-match pixel removal)
//!     |
//!     v
//! kmeans                         (K = num_colors + tweak centers,
//!     |                           restart-and-refine, lowest distortion)
//!     v
//! rank_dominant                  (top-N by frequency, final order by
//!     |                           brightness -- two separate sorts)
//!     v
//! render_bar                     (equal-width column bands)
//!     |
//!     v
//! OutputGrid::push_bar           (bars stacked in page order)
//! ```
//!
//! # Ordering semantics
//!
//! Ranking deliberately uses two sorts: frequency decides *which* colors
//! survive, brightness alone decides the *order* they appear in the bar.
//! See [`rank_dominant`] for the details.
//!
//! # Determinism
//!
//! Clustering initializes centers randomly. With a fixed seed
//! ([`ClusterOptions::seed`] / [`ColorExtractor::seed`]) the whole
//! pipeline is byte-reproducible; without one, each run draws from
//! entropy.

pub mod bar;
pub mod cluster;
pub mod color;
pub mod error;
pub mod extractor;
pub mod mask;
pub mod rank;


pub use bar::{render_bar, BarLayout, ColorBar, OutputGrid};
pub use cluster::{kmeans, ClusterOptions, ClusterResult};
pub use color::{ParseColorError, Rgb};
pub use error::ExtractError;
pub use extractor::{ColorExtractor, DEFAULT_TWEAK};
pub use mask::ColorBlacklist;
pub use rank::rank_dominant;

/// One decoded page image flattened row-major, alpha already stripped.
pub type PixelBuffer = Vec<Rgb>;
