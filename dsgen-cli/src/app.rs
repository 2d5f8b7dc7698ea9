use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// dsgen - typed dataset code generation from annotated XML Schemas
#[derive(Debug, Parser)]
#[command(name = "dsgen", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the typed dataset and its table adapters.
    Generate {
        /// Path to the dataset schema (.xsd).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Namespace the generated types are placed in.
        #[arg(short, long, default_value = "")]
        namespace: String,

        /// Target language of the generated code.
        #[arg(short, long, default_value = "cs")]
        language: String,

        /// Generate a TableAdapterManager for hierarchical updates.
        #[arg(long)]
        hierarchical_update: bool,

        /// Derive typed tables from TypedTableBase<T>.
        #[arg(long)]
        linq: bool,

        /// Write the code to a file instead of stdout.
        #[arg(short, long = "out", value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Display the dataset overview: tables, columns, relations and sources.
    Info {
        /// Path to the dataset schema (.xsd).
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Print the data provider of the default connection or of a table's connection.
    Provider {
        /// Path to the dataset schema (.xsd).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Table whose adapter connection is looked up.
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Print the signature of one accessor method.
    Signature {
        /// Path to the dataset schema (.xsd).
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Table owning the source; omit for data-source level functions.
        #[arg(short, long)]
        table: Option<String>,

        /// Source name; defaults to the table's main source.
        #[arg(short, long, value_name = "NAME")]
        query: Option<String>,

        /// Print the Get variant instead of Fill.
        #[arg(long)]
        get: bool,

        /// Print the paging variant.
        #[arg(long)]
        paging: bool,

        /// Container of Fill methods: DataSet or DataTable.
        #[arg(long, default_value = "DataTable")]
        container: String,

        /// Target language.
        #[arg(short, long, default_value = "cs")]
        language: String,
    },

    /// Encode a property-reference expression, given as JSON, into its persisted form.
    RefEncode {
        /// The expression as JSON, or a path to a file holding it.
        #[arg(value_name = "JSON|FILE")]
        expression: String,
    },

    /// Decode a persisted property reference.
    RefDecode {
        /// The persisted text, e.g. ApplicationSettings.My.Settings.0.Default.Conn
        #[arg(value_name = "TEXT")]
        text: String,
    },
}
