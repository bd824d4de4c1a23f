use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use irg::{CaptureHeader, IrgImage, Layout, Range};
use serde_derive::*;
use tracing::debug;

use super::Args;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub path: String,
    pub layout: Layout,
    pub header: CaptureHeader,
    /// Fahrenheit.
    pub temperature: Option<Range>,
}

/// `<outdir>/<stem><suffix>`, the stem being the file name
/// up to its first `.`.
pub fn output_path(outdir: &Path, path: &Path, suffix: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    outdir.join(format!("{}{}", stem, suffix))
}

/// Create the output directory when previews are saved.
pub fn prepare_outdir(args: &Args) -> Result<()> {
    if args.save {
        create_dir_all(&args.outdir)
            .with_context(|| format!("creating output directory {}", args.outdir.display()))?;
    }
    Ok(())
}

/// Header print of one capture, as shown by `--header`.
pub fn header_listing(path: &Path, image: &IrgImage) -> String {
    format!(
        "{} ({:?} layout)\n{}\n",
        path.display(),
        image.layout,
        image.header
    )
}

pub fn export(path: &Path, image: &IrgImage, args: &Args) -> Result<Summary> {
    if args.save {
        let gray_path = output_path(&args.outdir, path, "_bw.jpg");
        let thermal_path = output_path(&args.outdir, path, "_thermal.jpg");
        image.save_grayscale(&gray_path)?;
        image.save_thermal(&thermal_path, args.colormap, args.range)?;
        debug!(
            gray = %gray_path.display(),
            thermal = %thermal_path.display(),
            "saved previews"
        );
    }

    Ok(Summary {
        path: path.display().to_string(),
        layout: image.layout,
        header: image.header,
        temperature: Range::of(&image.temperatures()),
    })
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use irg::{Colormap, IrgImage, Range};

    use super::*;

    /// Compact 2x2 capture: grayscale 10..40, thermal
    /// 273.0..276.0 K, emissivity 0.95.
    fn capture_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; 0x80];
        for &(size_at, dims_at) in [(0x04, 0x08), (0x0D, 0x11)].iter() {
            bytes[size_at..size_at + 4].copy_from_slice(&4u32.to_le_bytes());
            bytes[dims_at..dims_at + 2].copy_from_slice(&2u16.to_le_bytes());
            bytes[dims_at + 2..dims_at + 4].copy_from_slice(&2u16.to_le_bytes());
        }
        bytes[0x1E..0x22].copy_from_slice(&9500u32.to_le_bytes());
        bytes[0x7E..0x80].copy_from_slice(&[0xAC, 0xCA]);

        bytes.extend_from_slice(&[10, 20, 30, 40]);
        for raw in [2730u16, 2740, 2750, 2760].iter() {
            bytes.extend_from_slice(&raw.to_le_bytes());
        }
        bytes.resize(bytes.len() + 1350, 0);
        bytes
    }

    fn save_args(outdir: PathBuf, range: Option<Range>) -> Args {
        Args {
            paths: vec![],
            outdir,
            save: true,
            print_header: false,
            json: true,
            colormap: Colormap::Inferno,
            range,
        }
    }

    fn pixel_sum(path: &Path) -> Result<u32> {
        let img = image::open(path)?.to_rgb8();
        Ok(img.into_raw().iter().map(|&b| b as u32).sum())
    }

    #[test]
    fn export_saves_previews_and_summarizes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cap.001.irg");
        let image = IrgImage::from_bytes(&capture_bytes())?;
        let args = save_args(dir.path().join("out"), Some(Range::new(60., 90.)));

        prepare_outdir(&args)?;
        let summary = export(&path, &image, &args)?;
        assert!(args.outdir.join("cap_bw.jpg").is_file());
        assert!(args.outdir.join("cap_thermal.jpg").is_file());

        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["path"], path.display().to_string());
        assert_eq!(json["layout"], "compact");
        assert_eq!(json["header"]["first_image"]["size"], 4);
        assert_eq!(json["header"]["second_image"]["width"], 2);
        assert_eq!(json["header"]["second_image"]["height"], 2);
        assert_eq!(json["header"]["emissivity"], 9500);
        let min = json["temperature"]["min"].as_f64().unwrap();
        let max = json["temperature"]["max"].as_f64().unwrap();
        assert!((min - 31.73).abs() < 1e-9, "min {}", min);
        assert!((max - 37.13).abs() < 1e-9, "max {}", max);
        Ok(())
    }

    #[test]
    fn display_range_changes_thermal_export() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("cap.irg");
        let image = IrgImage::from_bytes(&capture_bytes())?;

        let own = save_args(dir.path().join("own"), None);
        // The whole capture is below 60 F.
        let fixed = save_args(dir.path().join("fixed"), Some(Range::new(60., 90.)));
        for args in [&own, &fixed].iter() {
            prepare_outdir(args)?;
            export(&path, &image, args)?;
        }

        let own_sum = pixel_sum(&own.outdir.join("cap_thermal.jpg"))?;
        let fixed_sum = pixel_sum(&fixed.outdir.join("cap_thermal.jpg"))?;
        assert!(fixed_sum < own_sum, "{} !< {}", fixed_sum, own_sum);
        Ok(())
    }

    #[test]
    fn nothing_is_written_without_save() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let image = IrgImage::from_bytes(&capture_bytes())?;
        let mut args = save_args(dir.path().join("out"), None);
        args.save = false;

        prepare_outdir(&args)?;
        let summary = export(&dir.path().join("cap.irg"), &image, &args)?;
        assert!(!args.outdir.exists());
        assert_eq!(summary.header.first_image.width, 2);
        Ok(())
    }

    #[test]
    fn header_listing_names_capture() -> Result<()> {
        let image = IrgImage::from_bytes(&capture_bytes())?;
        let listing = header_listing(Path::new("data/cap.irg"), &image);
        assert!(listing.starts_with("data/cap.irg (Compact layout)\n"));
        assert!(listing.contains(&image.header.to_string()));
        Ok(())
    }

    #[test]
    fn stem_ends_at_first_dot() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("/data/cap.001.irg"), "_bw.jpg"),
            Path::new("out").join("cap_bw.jpg")
        );
        assert_eq!(
            output_path(Path::new("."), Path::new("IR_0042"), "_thermal.jpg"),
            Path::new(".").join("IR_0042_thermal.jpg")
        );
    }
}
