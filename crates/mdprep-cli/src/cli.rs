use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "mdprep developers",
    version,
    about = "mdprep - Prepare, configure and analyze molecular dynamics simulations for the ACEMD engine.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a production run directory from an equilibrated system.
    Production(ProductionArgs),
    /// Collect propKa predictions into a per-residue table.
    Residues(ResiduesArgs),
    /// Run the null projection over a structure's frames.
    Project(ProjectArgs),
    /// Show or configure the mdprep installation root.
    Home(HomeArgs),
}

/// Arguments for the `production` subcommand.
#[derive(Args, Debug)]
pub struct ProductionArgs {
    /// Directory holding the equilibrated input files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory to write the production setup into. Replaced if it exists.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,

    /// Protocol configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Thermostat temperature in Kelvin.
    #[arg(short, long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Flat-bottom force constant in kcal/mol/A^2. Zero disables the restraint.
    #[arg(short, value_name = "FLOAT")]
    pub k: Option<f64>,

    /// Atoms whose center defines the flat-bottom box position.
    #[arg(long, value_name = "SELECTION")]
    pub reference: Option<String>,

    /// Atoms kept inside the flat-bottom box.
    #[arg(long, value_name = "SELECTION")]
    pub selection: Option<String>,

    /// Flat-bottom box relative to the reference center.
    #[arg(
        long = "box",
        num_args = 6,
        allow_negative_numbers = true,
        value_names = ["XMIN", "XMAX", "YMIN", "YMAX", "ZMIN", "ZMAX"]
    )]
    pub flatbottom: Option<Vec<f64>>,

    /// Simulation length passed to ACEMD (e.g. 50ns or a step count).
    #[arg(long, value_name = "LENGTH")]
    pub run: Option<String>,

    /// Remove an ACEMD setting from the generated configuration. Can be repeated.
    #[arg(long, value_name = "KEY")]
    pub unset: Vec<String>,
}

/// Arguments for the `residues` subcommand.
#[derive(Args, Debug)]
pub struct ResiduesArgs {
    /// propKa report (.pka) to import.
    #[arg(long, required = true, value_name = "PATH")]
    pub pka: PathBuf,

    /// Write the table as CSV instead of printing it.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `project` subcommand.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Structure file (PDB); every MODEL is one frame.
    #[arg(required = true, value_name = "PATH")]
    pub structure: PathBuf,

    /// Number of projected dimensions.
    #[arg(long, default_value_t = 1, value_name = "INT")]
    pub ndim: usize,
}

/// Arguments for the `home` subcommand.
#[derive(Args, Debug)]
#[command(args_conflicts_with_subcommands = true)]
pub struct HomeArgs {
    #[command(subcommand)]
    pub command: Option<HomeCommands>,

    /// Print the path of a named data directory instead of the root.
    #[arg(long, value_name = "NAME", conflicts_with = "lib")]
    pub data: Option<String>,

    /// Print the platform library directory instead of the root.
    #[arg(long)]
    pub lib: bool,
}

#[derive(Subcommand, Debug)]
pub enum HomeCommands {
    /// Persist a custom installation root.
    SetPath {
        /// The new installation root.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Forget the custom root and use the default per-user location.
    ResetPath,
}
