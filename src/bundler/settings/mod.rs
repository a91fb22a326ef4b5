//! Configuration structures for packaging operations.
//!
//! This module provides the packaging request ([`PackInfo`]), its builder,
//! and the platform-specific settings it carries.

mod builder;
mod copy_resource;
mod core;
mod docker;
mod platform;
mod windows;

// Re-export all public types
pub use builder::PackInfoBuilder;
pub use copy_resource::CopyResource;
pub use core::{DEFAULT_FETCH_TIMEOUT, DEFAULT_HOME_DIR_NAME, PackInfo};
pub use docker::{DEFAULT_BUILD_TIMEOUT, DEFAULT_DOCKER_BINARY, DEFAULT_FROM_IMAGE, DockerSettings};
pub use platform::Platform;
pub use windows::WindowsSettings;
