pub mod fetch;
pub mod pipeline;
pub mod progress;
pub mod scrape;

pub use pipeline::Pipeline;
pub use scrape::{PageProvider, TapasClient};
