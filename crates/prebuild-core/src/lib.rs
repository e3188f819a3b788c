//! Fetch a prebuilt artifact archive for a platform (or an explicit URL),
//! verify its SHA-256 and unpack it.

pub mod config;
pub mod error;
pub mod logging;

pub mod checksum;
pub mod checksum_table;
pub mod extract;
pub mod fetcher;
pub mod platform;
pub mod request;
pub mod run;
pub mod storage;
pub mod transport;
pub mod url_model;

pub use checksum_table::ChecksumTable;
pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use platform::HostInfo;
