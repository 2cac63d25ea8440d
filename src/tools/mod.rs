//! External research tools
//!
//! - [`search`](crate::tools::search) - Web search via the Tavily API
//!
//! # Web Search
//!
//! ```ignore
//! let search = TavilySearch::new(api_key, config.search.clone());
//! let context = search.search("rust web frameworks").await?;
//! ```

/// Tavily web search provider.
pub mod search;

pub use search::{SearchProvider, TavilySearch};
