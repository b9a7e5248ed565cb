use clap::{Args, CommandFactory, Parser, Subcommand};
use rcbook::model::{VehicleField, VehicleFields};
use std::path::PathBuf;

/// Returns the version string, with the git hash appended for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "rcbook",
    bin_name = "rcbook",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Vehicle registration records with PDF certificates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to $RCBOOK_DATA_DIR, then the OS data dir)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Records,
    Documents,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Records => "Record Commands:",
            CommandGroup::Documents => "Document Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "add" | "list" | "view" | "edit" | "delete" => Some(CommandGroup::Records),
            "pdf" | "export" => Some(CommandGroup::Documents),
            "stats" | "sample" | "choices" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Records,
            CommandGroup::Documents,
            CommandGroup::Misc,
        ]
    }
}

/// Returns the grouped help output as a string
pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("rcbook {version}\n"));
    output.push_str("Vehicle registration records with PDF certificates\n");
    output.push('\n');
    output.push_str("Usage: rcbook [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("      --data-dir <DIR>  Data directory\n");
    output.push_str("  -v, --verbose         Verbose output\n");
    output.push_str("  -h, --help            Print help\n");
    output.push_str("  -V, --version         Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for a command by name, falling back to the grouped help
pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            print!("{}", subcmd.render_help());
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

pub fn print_subcommand_help(command: &Option<Commands>) {
    match command {
        Some(cmd) => print_help_for_command(cmd.name()),
        None => print_grouped_help(),
    }
}

/// One flag per vehicle attribute, shared by `add` and `edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct FieldArgs {
    /// Registration number, e.g. tn01ab1234 (formatted automatically)
    #[arg(short = 'n', long)]
    pub number: Option<String>,

    /// Owner's name
    #[arg(short = 'o', long)]
    pub owner: Option<String>,

    /// Vehicle class (see `rcbook choices`)
    #[arg(long)]
    pub class: Option<String>,

    /// Fuel type
    #[arg(long)]
    pub fuel: Option<String>,

    /// Chassis number
    #[arg(long)]
    pub chassis: Option<String>,

    /// Engine number
    #[arg(long)]
    pub engine: Option<String>,

    /// Manufacturer
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Model
    #[arg(long)]
    pub model: Option<String>,

    /// Registration date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub registered: Option<String>,

    /// Insurance valid till (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub insured_till: Option<String>,

    /// RTO office
    #[arg(long)]
    pub rto: Option<String>,

    /// Owner's address
    #[arg(long)]
    pub address: Option<String>,
}

impl FieldArgs {
    /// Supplied flags only; an empty string clears the field on edit.
    pub fn into_fields(self) -> VehicleFields {
        let pairs = [
            (VehicleField::VehicleNumber, self.number),
            (VehicleField::OwnerName, self.owner),
            (VehicleField::VehicleClass, self.class),
            (VehicleField::FuelType, self.fuel),
            (VehicleField::ChassisNumber, self.chassis),
            (VehicleField::EngineNumber, self.engine),
            (VehicleField::Manufacturer, self.manufacturer),
            (VehicleField::Model, self.model),
            (VehicleField::RegistrationDate, self.registered),
            (VehicleField::InsuranceValidTill, self.insured_till),
            (VehicleField::RtoOffice, self.rto),
            (VehicleField::OwnerAddress, self.address),
        ];

        let mut fields = VehicleFields::new();
        for (field, value) in pairs {
            fields.set(field, value);
        }
        fields
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a vehicle record
    #[command(alias = "n", display_order = 1)]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// List vehicle records
    #[command(alias = "ls", display_order = 2)]
    List {
        /// Only records containing this text in any field
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show every field of one or more records
    #[command(alias = "v", display_order = 3)]
    View {
        /// List indexes or id prefixes (e.g. 1 3 6f1c)
        #[arg(required = true, num_args = 1..)]
        refs: Vec<String>,
    },

    /// Change fields of a record
    #[command(alias = "e", display_order = 4)]
    Edit {
        /// List index or id prefix
        reference: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete one or more records
    #[command(alias = "rm", display_order = 5)]
    Delete {
        /// List indexes or id prefixes (e.g. 1 3 6f1c)
        #[arg(required = true, num_args = 1..)]
        refs: Vec<String>,
    },

    /// Write the registration certificate PDF for records
    #[command(display_order = 10)]
    Pdf {
        /// List indexes or id prefixes
        #[arg(required = true, num_args = 1..)]
        refs: Vec<String>,

        /// Output directory (defaults to the configured output-dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Zip certificates for several records into vehicle_pdfs_<date>.zip
    #[command(display_order = 11)]
    Export {
        /// Export every record in the (searched) list
        #[arg(long, conflicts_with = "refs")]
        all: bool,

        /// Resolve indexes against, or with --all export, this search
        #[arg(short, long)]
        search: Option<String>,

        /// List indexes or id prefixes
        #[arg(num_args = 0..)]
        refs: Vec<String>,

        /// Output directory (defaults to the configured output-dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Show record counts
    #[command(display_order = 20)]
    Stats,

    /// Add three demonstration records
    #[command(display_order = 21)]
    Sample,

    /// List suggested values for class, fuel, manufacturer and RTO
    #[command(display_order = 22)]
    Choices,

    /// Get or set configuration
    #[command(display_order = 23)]
    Config {
        /// Configuration key (background-image, output-dir, storage-key)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,

        /// Reset the key to its default
        #[arg(long, conflicts_with = "value")]
        unset: bool,
    },

    /// Print help for rcbook or a subcommand
    #[command(display_order = 30)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::List { .. } => "list",
            Commands::View { .. } => "view",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::Pdf { .. } => "pdf",
            Commands::Export { .. } => "export",
            Commands::Stats => "stats",
            Commands::Sample => "sample",
            Commands::Choices => "choices",
            Commands::Config { .. } => "config",
            Commands::Help { .. } => "help",
        }
    }
}
