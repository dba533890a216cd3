//! Sequential HTTP retrieval of discovered links.

mod retriever;

pub use retriever::{RetrievalEvent, RetrievalSummary, Retriever};
