//! Helpers to parse CLI arguments and drive batch
//! processing in the accompanying binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::path::PathBuf;

pub use clap::{App, Arg};
use indicatif::{ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{error::Result, IrgImage};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Install a stderr `tracing` subscriber filtered by
/// `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// A capture path and its decode outcome.
pub struct IrgInput {
    pub path: PathBuf,
    pub image: Result<IrgImage>,
}

/// Decode captures in parallel, one capture per task,
/// reporting progress on stderr.
pub fn process_paths_par(paths: Vec<PathBuf>) -> impl ParallelIterator<Item = IrgInput> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );

    paths
        .into_par_iter()
        .map(|path| {
            let image = IrgImage::from_path(&path);
            IrgInput { path, image }
        })
        .inspect(move |_| bar.inc(1))
}
