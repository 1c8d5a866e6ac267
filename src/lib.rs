pub mod core;
pub mod models;
pub mod readme;
pub mod services;

pub use crate::core::config::{ReadmePreviewConfig, RenderOptions};
pub use crate::core::errors::{Error, Result};
pub use crate::readme::DirectoryReadme;
