//! Utility modules for packaging operations.
//!
//! - [`compress`] - `.zip` and `.tar.gz` archives
//! - [`fs`] - directory and file copying
//! - [`http`] - remote resource fetching
//! - [`template`] - script and descriptor rendering

pub mod compress;
pub mod fs;
pub mod http;
pub mod template;
