use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::value_t_or_exit;
use irg::{arg, args_parser, opt, Colormap, Range};

pub struct Args {
    pub paths: Vec<PathBuf>,
    pub outdir: PathBuf,
    pub save: bool,
    pub print_header: bool,
    pub json: bool,
    pub colormap: Colormap,
    pub range: Option<Range>,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = args_parser!("irg-extract")
            .setting(clap::AppSettings::AllowLeadingHyphen)
            .about("Extract previews and thermal data from IRG captures.")
            .arg(
                opt!("save")
                    .short("s")
                    .takes_value(false)
                    .help("Save each capture as grayscale and thermal JPGs"),
            )
            .arg(
                opt!("header")
                    .short("H")
                    .takes_value(false)
                    .help("Print the decoded header of each capture"),
            )
            .arg(
                opt!("json")
                    .short("j")
                    .takes_value(false)
                    .help("Print a JSON summary of the captures to stdout"),
            )
            .arg(
                opt!("outdir")
                    .default_value(".")
                    .help("Directory to save the output JPGs"),
            )
            .arg(
                opt!("colormap")
                    .default_value("inferno")
                    .help("Colormap of the thermal image: inferno or gray"),
            )
            .arg(
                opt!("min")
                    .requires("max")
                    .help("Temperature (F) at the low end of the colormap. Default is the capture min"),
            )
            .arg(
                opt!("max")
                    .requires("min")
                    .help("Temperature (F) at the high end of the colormap. Default is the capture max"),
            )
            .arg(
                arg!("paths")
                    .required(true)
                    .multiple(true)
                    .help("IRG capture paths"),
            )
            .get_matches();

        let paths = matches
            .values_of("paths")
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect();
        let outdir = value_t_or_exit!(matches, "outdir", PathBuf);
        let colormap = matches
            .value_of("colormap")
            .unwrap_or("inferno")
            .parse::<Colormap>()?;
        let range = if matches.is_present("min") {
            let min = value_t_or_exit!(matches, "min", f64);
            let max = value_t_or_exit!(matches, "max", f64);
            ensure!(min <= max, "--min {} is above --max {}", min, max);
            Some(Range::new(min, max))
        } else {
            None
        };

        Ok(Args {
            paths,
            outdir,
            save: matches.is_present("save"),
            print_header: matches.is_present("header"),
            json: matches.is_present("json"),
            colormap,
            range,
        })
    }
}
