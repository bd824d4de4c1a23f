mod args;
mod proc;

use anyhow::{Context, Result};
use irg::cli::{init_logging, process_paths_par, IrgInput};
use rayon::prelude::*;
use tracing::info;

use crate::{
    args::Args,
    proc::{export, header_listing, prepare_outdir, Summary},
};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;

    prepare_outdir(&args)?;

    let summaries = process_paths_par(args.paths.clone())
        .map(|IrgInput { path, image }| -> Result<Summary> {
            let image = image.with_context(|| format!("decoding {}", path.display()))?;
            if args.print_header {
                eprintln!("{}", header_listing(&path, &image));
            }
            export(&path, &image, &args)
                .with_context(|| format!("exporting {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    if args.json {
        serde_json::to_writer_pretty(std::io::stdout().lock(), &summaries)?;
        println!();
    }

    info!(count = summaries.len(), "processed captures");
    Ok(())
}
