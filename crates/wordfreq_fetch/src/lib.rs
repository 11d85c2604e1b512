//! Wordfreq fetch: retrieves a document over HTTP for counting.
mod fetch;
mod types;

pub use fetch::{FetchSettings, Fetcher, LogProgressSink, ProgressSink, ReqwestFetcher};
pub use types::{FailureKind, FetchError, FetchEvent, FetchMetadata, FetchedDocument};
