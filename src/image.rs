use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek},
    path::Path,
};

use ndarray::Array2;

use crate::{
    colormap::{write_raster, Colormap},
    error::Result,
    header::{read_header, CaptureHeader, Layout},
    payload::{extract, DecodedCapture},
    temperature::{fahrenheit, normalize, raw_to_fahrenheit, Range, KELVIN_SCALE},
};

/// A decoded IRG capture.
#[derive(Debug, Clone)]
pub struct IrgImage {
    pub header: CaptureHeader,
    pub layout: Layout,
    pub capture: DecodedCapture,
}

impl IrgImage {
    /// Decode a capture from a reader positioned at its
    /// first byte.
    pub fn from_reader<R: Read + Seek>(mut r: R) -> Result<Self> {
        let (header, layout) = read_header(&mut r)?;
        let capture = extract(&mut r, layout, &header)?;
        Ok(IrgImage {
            header,
            layout,
            capture,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Thermal grid in Fahrenheit.
    pub fn temperatures(&self) -> Array2<f64> {
        raw_to_fahrenheit(&self.capture.thermal)
    }

    /// Fahrenheit reading of a single thermal pixel.
    pub fn temperature_at(&self, row: usize, col: usize) -> Option<f64> {
        self.capture
            .thermal
            .get((row, col))
            .map(|&raw| fahrenheit(raw as f64 / KELVIN_SCALE))
    }

    /// Save the thermal grid colour-mapped over `range` (in
    /// Fahrenheit), defaulting to the capture's own range.
    pub fn save_thermal<P: AsRef<Path>>(
        &self,
        path: P,
        colormap: Colormap,
        range: Option<Range>,
    ) -> Result<()> {
        let unit = normalize(&self.temperatures(), range);
        write_raster(&unit, path, colormap)
    }

    /// Save the grayscale preview stretched over its own range.
    pub fn save_grayscale<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let unit = normalize(&self.capture.grayscale, None);
        write_raster(&unit, path, Colormap::Gray)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use ndarray::arr2;

    use super::*;
    use crate::{
        error::IrgError, payload::THUMBNAIL_LEN, temperature::to_physical,
        test_support::Synthetic,
    };

    fn two_by_two() -> Synthetic {
        Synthetic::new(
            (2, 2),
            vec![10, 20, 30, 40],
            (2, 2),
            vec![2730, 2740, 2750, 2760],
        )
    }

    #[test]
    fn decodes_hand_built_capture() -> Result<()> {
        let image = IrgImage::from_bytes(&two_by_two().bytes())?;
        assert_eq!(image.layout, Layout::Compact);
        assert_eq!(image.capture.grayscale, arr2(&[[10, 20], [30, 40]]));
        assert_eq!(
            to_physical(&image.capture.thermal),
            arr2(&[[273.0, 274.0], [275.0, 276.0]])
        );
        assert_eq!(image.capture.thumbnail.len(), THUMBNAIL_LEN);
        Ok(())
    }

    #[test]
    fn temperature_readout() -> Result<()> {
        let image = IrgImage::from_bytes(&two_by_two().bytes())?;
        let temps = image.temperatures();
        let at = image.temperature_at(1, 0).unwrap();
        assert_eq!(at, temps[(1, 0)]);
        assert!((at - 35.33).abs() < 1e-9);
        assert_eq!(image.temperature_at(2, 0), None);
        Ok(())
    }

    #[test]
    fn from_path_reads_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("capture.irg");
        let mut synthetic = two_by_two();
        synthetic.sentinel = false;
        std::fs::write(&path, synthetic.bytes())?;

        let image = IrgImage::from_path(&path)?;
        assert_eq!(image.layout, Layout::Extended);
        assert_eq!(image.capture.thermal, arr2(&[[2730, 2740], [2750, 2760]]));

        assert!(matches!(
            IrgImage::from_path(dir.path().join("missing.irg")),
            Err(IrgError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn saves_both_previews() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let image = IrgImage::from_bytes(&two_by_two().bytes())?;

        let thermal = dir.path().join("c_thermal.png");
        image.save_thermal(&thermal, Colormap::Inferno, None)?;
        let out = ::image::open(&thermal)?.to_rgb8();
        assert_eq!(out.get_pixel(0, 0).0, Colormap::Inferno.lookup(0.));
        assert_eq!(out.get_pixel(1, 1).0, Colormap::Inferno.lookup(1.));

        let gray = dir.path().join("c_bw.png");
        image.save_grayscale(&gray)?;
        let out = ::image::open(&gray)?.to_rgb8();
        assert_eq!(out.get_pixel(0, 0).0, [0; 3]);
        assert_eq!(out.get_pixel(1, 1).0, [255; 3]);
        Ok(())
    }

    #[test]
    fn explicit_range_changes_rendering() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let image = IrgImage::from_bytes(&two_by_two().bytes())?;
        let path = dir.path().join("clipped.png");
        image.save_thermal(&path, Colormap::Gray, Some(Range::new(0., 10.)))?;
        let out = ::image::open(&path)?.to_rgb8();
        assert!(out.pixels().all(|p| p.0 == [255; 3]));
        Ok(())
    }
}
