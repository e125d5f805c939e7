//! Transport: retrieves one URL into one local file, enforcing any
//! `checksum=<algorithm>:<hex>` directive carried in the URL's query.
//!
//! Higher layers (resolver, mirror fetcher) only depend on the [`Transport`]
//! trait; [`CurlTransport`] is the libcurl-backed implementation.

mod libcurl;
mod error;

pub use libcurl::{CurlOptions, CurlTransport};
pub use error::TransportError;

use std::path::Path;

/// Retrieves a resource into a destination path.
///
/// Implementations must verify the URL's `checksum` directive when present and
/// must never leave a partially written or unverified file at `dst`.
pub trait Transport: Send + Sync {
    fn get_file(&self, dst: &Path, url: &str) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get_file(&self, dst: &Path, url: &str) -> Result<(), TransportError> {
        (**self).get_file(dst, url)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn get_file(&self, dst: &Path, url: &str) -> Result<(), TransportError> {
        (**self).get_file(dst, url)
    }
}
