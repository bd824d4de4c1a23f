//! Fixed 128-byte IRG capture header.
//!
//! Only the first [`DECODED_LEN`] bytes carry fields. The
//! last two bytes of the header act as a format version
//! discriminator: see [`Layout`].
use std::{fmt, io::Read};

use byteordered::{byteorder::ReadBytesExt, ByteOrdered, Endian};
use serde_derive::*;
use tracing::debug;

use crate::{
    error::{IrgError, Result},
    parse::{read_up_to, Parseable},
};

/// Bytes occupied by the header in every capture.
pub const HEADER_LEN: usize = 128;

/// Bytes of the header that hold decoded fields.
pub const DECODED_LEN: usize = 75;

/// Magic pair selecting [`Layout::Compact`].
pub const SENTINEL: [u8; 2] = [0xAC, 0xCA];
const SENTINEL_OFFSET: usize = 0x7E;

/// A fixed-point value stored as an integer scaled by
/// 10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FixedPoint(pub u32);

impl FixedPoint {
    pub const SCALE: f64 = 10000.;

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / Self::SCALE
    }
}

impl Parseable for FixedPoint {
    type Error = std::io::Error;
    fn parse<T: ReadBytesExt, E: Endian>(
        r: &mut ByteOrdered<T, E>,
    ) -> std::result::Result<Self, Self::Error> {
        Ok(FixedPoint(u32::parse(r)?))
    }
}

declare_parseable_structs! {
    /// Size and dimensions of one embedded image.
    ///
    /// The meaning of `size` depends on the image: bytes
    /// for the grayscale preview, 16-bit elements for the
    /// thermal grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct ImageBlock {
        pub size => u32,
        pub width => u16,
        pub height => u16,
    }

    /// Decoded capture header.
    ///
    /// Fields without known semantics are kept verbatim.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub struct CaptureHeader {
        pub unknown_header => i32,
        /// Grayscale preview.
        pub first_image => ImageBlock,
        pub pad1 => i8,
        /// Raw thermal grid.
        pub second_image => ImageBlock,
        pub pad2 => u8,
        /// Embedded colour thumbnail.
        pub third_image => ImageBlock,
        pub emissivity => FixedPoint,
        /// Kelvin.
        pub reflective_temperature => FixedPoint,
        /// Kelvin.
        pub ambient_temperature => FixedPoint,
        /// Meters.
        pub distance => FixedPoint,
        pub unknown => u32,
        pub transmissivity => FixedPoint,
        pub padding => u32,
        pub unknown2 => u16,
        pub reserved => [u8; 14],
        pub unknown3 => u8,
    }
}

impl ImageBlock {
    /// Number of pixels implied by the dimensions.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Grid shape as `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }
}

impl CaptureHeader {
    /// Decode the header fields from the raw header bytes.
    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        let mut rdr = ByteOrdered::le(&bytes[..DECODED_LEN]);
        Ok(Self::parse(&mut rdr)?)
    }
}

impl fmt::Display for CaptureHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let blocks = [
            ("first", &self.first_image),
            ("second", &self.second_image),
            ("third", &self.third_image),
        ];
        writeln!(f, "unknown header             : {}", self.unknown_header)?;
        for (name, block) in blocks.iter() {
            writeln!(
                f,
                "{:<6} image                : {} ({}x{})",
                name, block.size, block.width, block.height
            )?;
        }
        writeln!(f, "pads                       : {} {}", self.pad1, self.pad2)?;
        writeln!(f, "emissivity                 : {}", self.emissivity.value())?;
        writeln!(
            f,
            "reflective temperature (K) : {}",
            self.reflective_temperature.value()
        )?;
        writeln!(
            f,
            "ambient temperature (K)    : {}",
            self.ambient_temperature.value()
        )?;
        writeln!(f, "distance (m)               : {}", self.distance.value())?;
        writeln!(f, "transmissivity             : {}", self.transmissivity.value())?;
        write!(
            f,
            "unknown                    : {} {} {} {}",
            self.unknown, self.padding, self.unknown2, self.unknown3
        )
    }
}

/// Payload layout, selected by the sentinel bytes at the
/// end of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Sentinel present: payload follows the header.
    Compact,
    /// No sentinel: payload starts at `0x100`.
    Extended,
}

impl Layout {
    pub fn resolve(header: &[u8; HEADER_LEN]) -> Self {
        if header[SENTINEL_OFFSET..SENTINEL_OFFSET + 2] == SENTINEL {
            Layout::Compact
        } else {
            Layout::Extended
        }
    }

    /// Absolute stream offset of the first payload byte.
    pub fn payload_offset(self) -> u64 {
        match self {
            Layout::Compact => 0x80,
            Layout::Extended => 0x100,
        }
    }
}

/// Read the header from the start of a capture and resolve
/// its payload layout.
pub fn read_header<R: Read + ?Sized>(r: &mut R) -> Result<(CaptureHeader, Layout)> {
    let mut buf = [0u8; HEADER_LEN];
    let available = read_up_to(r, &mut buf)?;
    if available < HEADER_LEN {
        return Err(IrgError::TruncatedHeader {
            expected: HEADER_LEN,
            available,
        });
    }

    let header = CaptureHeader::from_bytes(&buf)?;
    let layout = Layout::resolve(&buf);
    debug!(
        ?layout,
        grayscale = ?header.first_image,
        thermal = ?header.second_image,
        "decoded capture header"
    );
    Ok((header, layout))
}
