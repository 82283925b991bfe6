use cadastro::config::Backend;
use cadastro::model::{Address, AddressPatch};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    File,
    Document,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::File => Backend::File,
            BackendArg::Document => Backend::Document,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cadastro", bin_name = "cadastro", version)]
#[command(about = "Client registry keyed by CPF", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Storage backend (overrides config.json)
    #[arg(short, long, global = true, value_enum, help_heading = "Options")]
    pub backend: Option<BackendArg>,

    /// Data directory (overrides CADASTRO_HOME)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new client
    Add {
        /// Full name
        name: String,

        /// CPF, with or without punctuation
        cpf: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// List clients
    #[command(alias = "ls")]
    List {
        /// Only active clients
        #[arg(long, conflicts_with = "inactive")]
        active: bool,

        /// Only inactive clients
        #[arg(long)]
        inactive: bool,

        /// Sort by name instead of registration order
        #[arg(long, conflicts_with = "recent")]
        sort_name: bool,

        /// Most recently deactivated first
        #[arg(long)]
        recent: bool,
    },

    /// Show one client by CPF or id
    Show { identifier: String },

    /// Search clients by name
    Search {
        term: String,

        #[arg(long)]
        sort_name: bool,
    },

    /// List clients living in a city
    City { name: String },

    /// Change a client's data; an empty value clears an optional field
    Update {
        identifier: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        cpf: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[command(flatten)]
        address: AddressArgs,
    },

    /// Deactivate a client, or delete it for good with --hard
    #[command(alias = "rm")]
    Remove {
        identifier: String,

        #[arg(long)]
        hard: bool,
    },

    /// Reactivate a deactivated client
    Reactivate { identifier: String },

    /// Registry statistics
    Stats,

    /// Delete clients inactive for longer than the given number of days
    Purge {
        /// Defaults to the configured purge window
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
        days: Option<i64>,
    },

    /// List backups of the data file, newest first
    Backups,

    /// Register every client in a JSON file holding an array of clients
    Import {
        /// Entries use the data file's field names (nome, cpf, email, telefone, endereco)
        file: PathBuf,
    },

    /// Permanently remove every client
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct AddressArgs {
    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub cep: Option<String>,
}

impl AddressArgs {
    pub fn into_patch(self) -> AddressPatch {
        AddressPatch {
            street: self.street,
            number: self.number,
            district: self.district,
            city: self.city,
            state: self.state,
            postal_code: self.cep,
        }
    }

    /// Address for a new client; `None` when no flag was given.
    pub fn into_address(self) -> Option<Address> {
        self.into_patch().apply(None)
    }
}
