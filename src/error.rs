use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{parse::FieldError, payload::Region};

/// Errors raised while decoding or exporting a capture.
#[derive(Debug, Error)]
pub enum IrgError {
    #[error("truncated header: expected {expected} bytes, found {available}")]
    TruncatedHeader { expected: usize, available: usize },

    #[error(
        "short read in {region} region at offset {offset:#x}: expected {expected} bytes, found {actual}"
    )]
    ShortRead {
        region: Region,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("{region} region declares {declared} elements but its shape is {width}x{height}")]
    ShapeMismatch {
        region: Region,
        declared: u32,
        width: u16,
        height: u16,
    },

    #[error("unknown colormap `{0}`")]
    UnknownColormap(String),

    #[error("could not write raster to {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed header")]
    Header(#[from] FieldError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IrgError>;
