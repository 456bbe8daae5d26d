use dominant_color::{ParseColorError, Rgb};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What to do when a single page fails to download or cluster.
///
/// This replaces the original interactive retry/skip/quit prompt with a
/// configuration-time decision, so the pipeline runs unattended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Re-attempt the page a bounded number of times, then skip it
    Retry,
    /// Exclude the page from the output and continue
    #[default]
    Skip,
    /// Stop the whole run at the first page failure
    Abort,
}

/// Run configuration, loadable from a YAML file.
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    /// Episode id of the comic's first page
    #[serde(default)]
    pub initial_id: Option<String>,

    /// Number of dominant colors per page
    #[serde(default = "default_num_colors")]
    pub num_colors: usize,

    /// Width of each color column in pixels
    #[serde(default = "default_col_width")]
    pub col_width: usize,

    /// Bar thickness in pixel rows
    #[serde(default = "default_bar_thickness")]
    pub bar_thickness: usize,

    /// Worker pool size for parallel stages
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Extra cluster count above num_colors; 0 gives less vibrant output
    #[serde(default = "default_tweak")]
    pub tweak: usize,

    /// Hex colors removed before clustering. The defaults drop pure
    /// black, pure white and the speech-bubble fill.
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<String>,

    /// Per-page failure policy
    #[serde(default)]
    pub on_error: FailurePolicy,

    /// Fixed random seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Output image path
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_num_colors() -> usize {
    3
}

fn default_col_width() -> usize {
    200
}

fn default_bar_thickness() -> usize {
    3
}

fn default_workers() -> usize {
    2
}

fn default_tweak() -> usize {
    2
}

fn default_blacklist() -> Vec<String> {
    vec![
        "#000000".to_string(),
        "#C9C9C9".to_string(),
        "#FFFFFF".to_string(),
    ]
}

fn default_output() -> PathBuf {
    PathBuf::from("sorted.png")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            initial_id: None,
            num_colors: default_num_colors(),
            col_width: default_col_width(),
            bar_thickness: default_bar_thickness(),
            workers: default_workers(),
            tweak: default_tweak(),
            blacklist: default_blacklist(),
            on_error: FailurePolicy::default(),
            seed: None,
            output: default_output(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file, falling back to defaults on
    /// read or parse failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(path = %path.display(), "Loaded run configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse the hex blacklist entries into colors.
    pub fn blacklist_colors(&self) -> Result<Vec<Rgb>, ParseColorError> {
        self.blacklist.iter().map(|s| s.parse()).collect()
    }
}
