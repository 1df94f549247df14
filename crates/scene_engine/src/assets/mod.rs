//! Asset management system
//!
//! Resources are loaded on demand through a [`ResourceCache`], which picks
//! the loader registered for the requested resource type and memoizes the
//! result by key.

pub mod cache;
pub mod image_loader;
pub mod loader;
pub mod text_loader;

pub use cache::{CacheStats, ResourceCache};
pub use image_loader::{ImageData, ImageLoader};
pub use loader::{DynLoader, Loader, LoaderContext, LoaderFactory, LoaderRegistry};
pub use text_loader::TextLoader;

use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// A loader could not produce the resource
    #[error("Failed to load '{key}': {reason}")]
    LoadFailed {
        /// Resource key
        key: String,
        /// What went wrong
        reason: String,
    },

    /// No loader registered for the requested resource type
    #[error("No loader registered for {0}")]
    NoLoaderForType(&'static str),

    /// A factory produced a loader for another resource type
    #[error("Loader {loader} was registered for {expected} but produces {actual}")]
    InvalidLoaderType {
        /// Name of the offending loader
        loader: String,
        /// Type the loader was registered for
        expected: &'static str,
        /// Type the loader actually produces
        actual: &'static str,
    },

    /// Two loaders claim the same resource type
    #[error("A loader for {resource} is already registered ({existing})")]
    DuplicateLoader {
        /// Resource type
        resource: &'static str,
        /// Name of the loader that got there first
        existing: String,
    },

    /// Cached key requested as a different type
    #[error("Resource '{key}' is cached as {actual}, not {expected}")]
    TypeMismatch {
        /// Resource key
        key: String,
        /// Requested type
        expected: &'static str,
        /// Cached type
        actual: &'static str,
    },

    /// The cache has been released
    #[error("Resource cache has been unloaded")]
    Unloaded,

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error during asset loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
