mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use addcal_core::addcal_config::AddCalConfig;
use addcal_core::migrate::SkipMethod;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "addcal")]
#[command(about = "Export CMS events as .ics files and run the content helpers")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the .ics file for an event node
    Ics {
        /// Site export (JSON)
        site: PathBuf,

        /// Node id of the event
        node: String,

        /// Directory to write the file to
        #[arg(short, long, default_value = ".", conflicts_with = "stdout")]
        out: PathBuf,

        /// Print the calendar instead of writing a file
        #[arg(long)]
        stdout: bool,

        /// Shorten the description to this many characters
        #[arg(long)]
        max_length: Option<usize>,
    },
    /// List content related to a node
    Related {
        site: PathBuf,
        node: String,

        /// Number of items (defaults to related_limit from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the display date of a node
    DisplayDate { site: PathBuf, node: String },
    /// Print the dropdown element for an integer field as JSON
    Dropdown {
        #[arg(long, allow_hyphen_values = true)]
        min: i64,

        #[arg(long, allow_hyphen_values = true)]
        max: i64,

        /// Prefix, optionally "singular|plural"
        #[arg(long)]
        prefix: Option<String>,

        /// Suffix, optionally "singular|plural"
        #[arg(long)]
        suffix: Option<String>,

        /// Current field value
        #[arg(long, allow_hyphen_values = true)]
        value: Option<i64>,
    },
    /// Rewrite inline images of an HTML body into media embeds
    MigrateImages {
        /// File holding the legacy body markup
        file: PathBuf,

        /// Media manifest (defaults to media.manifest from config)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Check whether a file would be skipped by its MIME type
    FileType {
        path: String,

        /// MIME types to compare against
        #[arg(long = "value", required = true)]
        values: Vec<String>,

        /// Skip when the type is NOT one of the values
        #[arg(long)]
        not_equals: bool,

        #[arg(long, value_enum, default_value_t = MethodArg::Row)]
        method: MethodArg,
    },
    /// Show config paths and effective settings
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Row,
    Process,
}

impl From<MethodArg> for SkipMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Row => SkipMethod::Row,
            MethodArg::Process => SkipMethod::Process,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = AddCalConfig::load()?;

    match cli.command {
        Commands::Ics {
            site,
            node,
            out,
            stdout,
            max_length,
        } => commands::ics::run(&config, &site, &node, &out, stdout, max_length),
        Commands::Related { site, node, limit } => {
            commands::related::run(&config, &site, &node, limit)
        }
        Commands::DisplayDate { site, node } => commands::display_date::run(&config, &site, &node),
        Commands::Dropdown {
            min,
            max,
            prefix,
            suffix,
            value,
        } => commands::dropdown::run(min, max, prefix, suffix, value),
        Commands::MigrateImages { file, manifest } => {
            commands::migrate::run(&config, &file, manifest)
        }
        Commands::FileType {
            path,
            values,
            not_equals,
            method,
        } => commands::file_type::run(&path, values, not_equals, method.into()),
        Commands::Config => commands::config::run(&config),
    }
}
