//! Library to decode IRG thermal camera captures.
//!
//! An IRG capture is a 128-byte [header] followed by three
//! payload regions: an 8-bit grayscale preview, a 16-bit
//! raw thermal grid (Kelvin scaled by 10), and a small
//! opaque colour thumbnail.
//!
//! This crate provides three functionalities:
//!
//! 1. [Decode](IrgImage) the header and the payload grids
//! from a file or any seekable reader. Header fields keep
//! their raw values; fixed-point fields expose their
//! physical value via [`FixedPoint::value`].
//!
//! 2. Compute [temperature]s from raw thermal values and
//! normalize grids over a display [`Range`].
//!
//! 3. Render normalized grids through a [colormap] and
//! encode them as raster images.
//!
//! # Usage
//!
//! ```rust
//! # fn test_compile() -> anyhow::Result<()> {
//! use irg::{Colormap, IrgImage};
//!
//! let image = IrgImage::from_path("capture.irg")?;
//! println!("{}", image.header);
//!
//! let temperatures = image.temperatures();
//! image.save_thermal("capture_thermal.jpg", Colormap::Inferno, None)?;
//! image.save_grayscale("capture_bw.jpg")?;
//! # Ok(())
//! # }
//! ```
//!
//! Interactive viewers re-render on range changes with the
//! pure functions directly:
//!
//! ```rust
//! # fn test_compile(image: &irg::IrgImage) {
//! use irg::{colormap::colorize, temperature::normalize, Colormap, Range};
//!
//! let fahrenheit = image.temperatures();
//! let unit = normalize(&fahrenheit, Some(Range::new(60., 90.)));
//! let rgb = colorize(&unit, Colormap::Inferno);
//! # }
//! ```

#[macro_use]
mod parse;

pub mod colormap;
pub mod error;
pub mod header;
pub mod image;
pub mod payload;
pub mod temperature;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod test_support;

pub use crate::colormap::Colormap;
pub use crate::error::{IrgError, Result};
pub use crate::header::{CaptureHeader, FixedPoint, ImageBlock, Layout};
pub use crate::image::IrgImage;
pub use crate::parse::FieldError;
pub use crate::payload::{DecodedCapture, Region};
pub use crate::temperature::Range;
