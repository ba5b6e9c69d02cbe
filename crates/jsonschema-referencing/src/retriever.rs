use core::fmt;

use serde_json::Value;

/// Caller-supplied fetch callback for schemas not already registered.
///
/// Implementors fetch whatever external transport the host embeds (HTTP,
/// filesystem, an in-memory bundle); this crate never performs network I/O
/// on its own.
pub trait Retrieve: Send + Sync {
    /// Attempts to retrieve a resource from the given URI.
    ///
    /// # Errors
    ///
    /// If the resource couldn't be retrieved or the fetched content wasn't valid JSON.
    fn retrieve(&self, uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone)]
struct DefaultRetrieverError;

impl fmt::Display for DefaultRetrieverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("the default retriever does not fetch resources")
    }
}

impl std::error::Error for DefaultRetrieverError {}

/// A [`Retrieve`] that never succeeds; used when a host embeds this crate
/// without wiring up an actual fetch callback.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DefaultRetriever;

impl Retrieve for DefaultRetriever {
    fn retrieve(&self, _uri: &str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(DefaultRetrieverError))
    }
}
