//! Search capability used by the research stage.

mod memory;
mod youtube;

pub use memory::StaticSearch;
pub use youtube::YoutubeSearch;

use crate::error::Result;
use crate::pipeline::ResearchItem;
use async_trait::async_trait;

/// Trait for video search providers.
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Search for videos matching `query`, returning at most `max_results` items.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ResearchItem>>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}
