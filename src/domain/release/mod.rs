//! Release domain - installer platforms and their download locations.

mod catalog;
mod platform;

pub use catalog::{DownloadCatalog, DEFAULT_RELEASE_VERSION};
pub use platform::Platform;
