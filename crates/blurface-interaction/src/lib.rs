//! Remote I/O for Blurface.
//!
//! `HttpVideoApi` implements the API contract over HTTP with reqwest and
//! `FileDownloadTrigger` saves processed videos to a local directory.

pub mod file_download;
pub mod http_api;

#[cfg(test)]
mod test_server;

pub use file_download::FileDownloadTrigger;
pub use http_api::HttpVideoApi;
