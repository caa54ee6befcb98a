//! Error types for the renderer.
//!
//! The intersection and shading path is total and never fails; errors only
//! arise while validating settings, loading assets, or writing output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up or finishing a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to load asset {}: {source}", path.display())]
    AssetLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start render workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
