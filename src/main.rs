use std::io::{stdout, Write};

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

use primaries::catalog::Catalog;
use primaries::config::{self, AppConfig};
use primaries::error::ColorResult;
use primaries::output::{self, ListEntry, ListReport, OutputFormat, SpaceReport, TransformReport};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// YAML config file with output defaults and extra color spaces
    #[arg(short, long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Number of decimals in text output
    #[arg(short, long, global = true)]
    precision: Option<usize>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    // Defaults to converting Rec.709 to Rec.2020
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
enum Command {
    /// Print the matrices converting linear RGB from one space to another
    Convert {
        #[arg(default_value = "rec709")]
        source: String,
        #[arg(default_value = "rec2020")]
        dest: String,
    },

    /// Print the RGB to XYZ matrices for a single color space
    Matrix { space: String },

    /// List known color spaces
    List,
}

impl Default for Command {
    fn default() -> Self {
        Self::Convert {
            source: "rec709".to_string(),
            dest: "rec2020".to_string(),
        }
    }
}

fn init_logging() -> ColorResult<()> {
    let mut builder = pretty_env_logger::formatted_builder();

    if let Ok(s) = ::std::env::var("RUST_LOG") {
        builder.parse_filters(&s);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    Ok(builder.try_init()?)
}

fn load_config(args: &Cli) -> ColorResult<AppConfig> {
    let conf = if let Some(conffile) = &args.config {
        log::debug!("Loading configuration from [{conffile}]");
        config::parse(conffile)?
    } else {
        config::defaults()?
    };

    Ok(conf.apply_overrides(args.precision, args.format))
}

fn run(args: &Cli) -> ColorResult<()> {
    let conf = load_config(args)?;
    let catalog = Catalog::from_config(&conf)?;

    let format = conf.output.format;
    let precision = conf.output.precision;
    let mut out = stdout().lock();

    match args.command.clone().unwrap_or_default() {
        Command::Convert { source, dest } => {
            let src = catalog.get(&source)?;
            let dst = catalog.get(&dest)?;
            log::info!("Computing transform [{}] -> [{}]", src.name, dst.name);

            let report = TransformReport {
                source: src.name.clone(),
                dest: dst.name.clone(),
                transform: src.transform_to(dst)?,
            };
            output::emit(&mut out, &report, format, precision)?;
        }
        Command::Matrix { space } => {
            let report = SpaceReport::new(catalog.get(&space)?)?;
            output::emit(&mut out, &report, format, precision)?;
        }
        Command::List => {
            let report = ListReport(
                catalog
                    .iter()
                    .map(|(key, space)| ListEntry {
                        key: key.clone(),
                        space: space.clone(),
                    })
                    .collect(),
            );
            output::emit(&mut out, &report, format, precision)?;
        }
    }

    Ok(out.flush()?)
}

fn main() {
    let args = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("Failed to initialize logging: {err}");
    }

    if let Err(err) = run(&args) {
        log::error!("primaries error: {err}");
        std::process::exit(1);
    }
}
