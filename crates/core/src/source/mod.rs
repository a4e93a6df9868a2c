//! Upstream stream providers.
//!
//! A `StreamSource` returns the stream listing one provider has for a single
//! content id. Provider failures never escape `fetch`: they are logged,
//! counted, and reduced to an empty contribution so a slow or broken
//! provider cannot fail a request.

mod http;
mod types;

pub use http::HttpSource;
pub use types::*;
