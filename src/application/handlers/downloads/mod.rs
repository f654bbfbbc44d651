//! Download handlers.

mod resolve_download;

pub use resolve_download::{DownloadError, ResolveDownloadCommand, ResolveDownloadHandler, ResolvedDownload};
