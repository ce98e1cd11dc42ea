use std::path::PathBuf;

use structopt::clap::ArgGroup;
use structopt::StructOpt;

mod commands;
mod error;
mod util;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "viktar",
    about = "Create, list and extract viktar archives.",
    usage = "viktar (-c|-x|-t|-T) [-v] [-f archive] [files]...",
    group = ArgGroup::with_name("mode").required(true)
)]
struct CliOpts {
    #[structopt(short = "c", group = "mode", help = "Create an archive from the given files")]
    create: bool,

    #[structopt(short = "x", group = "mode", help = "Extract the given names, or everything")]
    extract: bool,

    #[structopt(short = "t", group = "mode", help = "List the names in an archive")]
    list: bool,

    #[structopt(short = "T", group = "mode", help = "List the names and headers in an archive")]
    list_headers: bool,

    #[structopt(
        short = "f",
        name = "archive",
        parse(from_os_str),
        help = "Archive to use instead of stdin/stdout"
    )]
    archive: Option<PathBuf>,

    #[structopt(short, long, help = "Show verbose output")]
    verbose: bool,

    #[structopt(
        name = "files",
        parse(from_os_str),
        help = "Files to add to the archive, or names to extract from it"
    )]
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Create,
    Extract,
    List { headers: bool },
}

impl CliOpts {
    /// Clap has already checked that exactly one mode flag is set.
    fn operation(&self) -> Operation {
        if self.create {
            Operation::Create
        } else if self.extract {
            Operation::Extract
        } else {
            Operation::List {
                headers: self.list_headers,
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());
    init_tracing(opts.verbose);

    let archive = opts.archive.as_deref();
    match opts.operation() {
        Operation::Create => commands::create(archive, &opts.files)?,
        Operation::Extract => commands::extract(archive, &opts.files)?,
        Operation::List { headers } => commands::list(archive, headers)?,
    };

    Ok(())
}
