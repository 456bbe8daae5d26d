use dominant_color::{ExtractError, ParseColorError};
use thiserror::Error;

/// Errors from chapter and page-URL discovery.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("episode list not found on page for id {0}")]
    EpisodeListMissing(String),

    #[error("no chapters found for comic {0}")]
    NoChapters(String),
}

/// Errors from downloading a page image.
///
/// Decode failures are not represented here: undecodable or monochrome
/// images are dropped silently at the fetch boundary, never surfaced as
/// errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A per-page failure, routed through the configured failure policy.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("color extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Fatal pipeline errors that end the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("chapter discovery failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("page {index} failed: {source}")]
    Page {
        index: usize,
        #[source]
        source: PageError,
    },

    #[error("no pages produced a color bar")]
    EmptyResult,

    #[error("invalid blacklist color: {0}")]
    Blacklist(#[from] ParseColorError),

    #[error("stage contract violation: {0}")]
    Malformed(#[from] ExtractError),

    #[error("failed to write output image: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_no_chapters() {
        let error = ScrapeError::NoChapters("143458".to_string());
        assert_eq!(error.to_string(), "no chapters found for comic 143458");
    }

    #[test]
    fn test_scrape_error_episode_list_missing() {
        let error = ScrapeError::EpisodeListMissing("143458".to_string());
        assert_eq!(
            error.to_string(),
            "episode list not found on page for id 143458"
        );
    }

    #[test]
    fn test_page_error_wraps_extract() {
        let error = PageError::Extract(ExtractError::InsufficientClusters {
            found: 1,
            requested: 3,
        });
        assert_eq!(
            error.to_string(),
            "color extraction failed: insufficient clusters: 1 non-empty, 3 dominant colors requested"
        );
    }

    #[test]
    fn test_pipeline_error_page_names_index() {
        let error = PipelineError::Page {
            index: 7,
            source: PageError::Extract(ExtractError::InsufficientPixels {
                available: 0,
                required: 5,
            }),
        };
        assert!(error.to_string().starts_with("page 7 failed"));
    }

    #[test]
    fn test_pipeline_error_empty_result() {
        let error = PipelineError::EmptyResult;
        assert_eq!(error.to_string(), "no pages produced a color bar");
    }

    #[test]
    fn test_pipeline_error_from_extract_is_malformed() {
        let error: PipelineError = ExtractError::MalformedInput {
            what: "bar width",
            expected: 600,
            actual: 400,
        }
        .into();
        match error {
            PipelineError::Malformed(_) => {}
            _ => panic!("expected Malformed variant"),
        }
    }
}
