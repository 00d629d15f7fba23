use std::future::Future;
use std::string::FromUtf8Error;

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::util::http::InvalidUriError;

/// Errors reported by a remote store.
///
/// The `Display` output is the reason logged by the sync client.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store path: {0}")]
    InvalidPath(#[from] InvalidUriError),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Remote returned error: ({0}) {1}")]
    Status(StatusCode, String),

    #[error("Payload of {size} bytes exceeds the {limit} byte send buffer")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Response exceeds the {0} byte limit")]
    ResponseTooLarge(usize),

    #[error("Document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Response is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// A remote key-value/document store addressed by slash-separated paths.
///
/// Every operation waits for the store to answer (or time out) before
/// returning.
pub trait RemoteStore {
    /// Store `value` as a string at `path`.
    fn set_string(
        &self,
        path: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Read the value at `path` as a string.
    ///
    /// String values are returned as-is, a missing value reads as an
    /// empty string and any other document is returned as JSON text.
    fn get_string(&self, path: &str) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Replace the value at `path` with `document`.
    fn set_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Append `document` as a new child of `path`, returning the key
    /// generated by the store.
    fn push_json<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;
}
