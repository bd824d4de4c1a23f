//! Extract the grayscale preview, the raw thermal grid and
//! the thumbnail that follow the header.
use std::{
    convert::TryFrom,
    fmt,
    io::{Read, Seek, SeekFrom},
};

use byteordered::byteorder::{ByteOrder, LittleEndian};
use ndarray::Array2;
use serde_derive::*;
use tracing::trace;

use crate::{
    error::{IrgError, Result},
    header::{CaptureHeader, ImageBlock, Layout},
};

/// Length of the trailing thumbnail blob. Fixed by the
/// format: it does not follow the third image block.
pub const THUMBNAIL_LEN: usize = 1350;

/// A payload region of a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Grayscale,
    Thermal,
    Thumbnail,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Region::Grayscale => "grayscale",
            Region::Thermal => "thermal",
            Region::Thumbnail => "thumbnail",
        })
    }
}

/// Buffers decoded from a capture payload.
///
/// Grids have shape `(width, height)` of their image block.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCapture {
    pub grayscale: Array2<u8>,
    /// Kelvin x 10.
    pub thermal: Array2<u16>,
    /// Opaque, not decoded further.
    pub thumbnail: Vec<u8>,
}

fn shape_error(region: Region, block: &ImageBlock) -> IrgError {
    IrgError::ShapeMismatch {
        region,
        declared: block.size,
        width: block.width,
        height: block.height,
    }
}

fn check_shape(region: Region, block: &ImageBlock) -> Result<()> {
    if block.pixel_count() != block.size as u64 {
        return Err(shape_error(region, block));
    }
    Ok(())
}

/// Byte length of a region of `elem_size`-byte elements. A
/// region that cannot be addressed on this target can never
/// be read in full.
fn region_len(region: Region, offset: u64, block: &ImageBlock, elem_size: u64) -> Result<usize> {
    usize::try_from(u64::from(block.size) * elem_size).map_err(|_| IrgError::ShortRead {
        region,
        offset,
        expected: usize::MAX,
        actual: 0,
    })
}

/// Reads one region starting at `offset`, failing unless
/// all of it is available.
fn read_region<R: Read>(r: &mut R, region: Region, offset: u64, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    r.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(IrgError::ShortRead {
            region,
            offset,
            expected: len,
            actual: buf.len(),
        });
    }
    trace!(%region, offset, len, "read payload region");
    Ok(buf)
}

/// Read the payload regions of a capture whose header has
/// already been decoded.
pub fn extract<R: Read + Seek>(
    r: &mut R,
    layout: Layout,
    header: &CaptureHeader,
) -> Result<DecodedCapture> {
    let gray_block = &header.first_image;
    let thermal_block = &header.second_image;
    check_shape(Region::Grayscale, gray_block)?;
    check_shape(Region::Thermal, thermal_block)?;

    let mut offset = layout.payload_offset();
    r.seek(SeekFrom::Start(offset))?;

    let gray_len = region_len(Region::Grayscale, offset, gray_block, 1)?;
    let gray = read_region(r, Region::Grayscale, offset, gray_len)?;
    offset += gray_len as u64;

    let thermal_len = region_len(Region::Thermal, offset, thermal_block, 2)?;
    let thermal_bytes = read_region(r, Region::Thermal, offset, thermal_len)?;
    offset += thermal_len as u64;
    let mut thermal = vec![0u16; thermal_len / 2];
    LittleEndian::read_u16_into(&thermal_bytes, &mut thermal);

    let thumbnail = read_region(r, Region::Thumbnail, offset, THUMBNAIL_LEN)?;

    Ok(DecodedCapture {
        grayscale: Array2::from_shape_vec(gray_block.shape(), gray)
            .map_err(|_| shape_error(Region::Grayscale, gray_block))?,
        thermal: Array2::from_shape_vec(thermal_block.shape(), thermal)
            .map_err(|_| shape_error(Region::Thermal, thermal_block))?,
        thumbnail,
    })
}
