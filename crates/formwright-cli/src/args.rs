use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "formwright", version, about = "Formwright CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Store root directory (default: .formwright)
    #[arg(long, global = true, default_value = ".formwright")]
    pub store_root: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a value set against a form schema document.
    Validate {
        /// Schema JSON file.
        schema: String,

        /// Values JSON file (object mapping field id to string value).
        #[arg(long)]
        values: Option<String>,

        /// Seed missing values from field defaults before validating.
        #[arg(long)]
        seed: bool,
    },

    /// Inspect a schema: fields, derived evaluation order, diagnostics.
    Inspect {
        /// Schema JSON file.
        schema: String,
    },

    /// Compute derived values for a schema and value set.
    Eval {
        /// Schema JSON file.
        schema: String,

        /// Values JSON file (object mapping field id to string value).
        #[arg(long)]
        values: Option<String>,

        /// Seed missing values from field defaults first.
        #[arg(long)]
        seed: bool,
    },

    /// List schemas saved in the store.
    List,

    /// Save a schema document into the store.
    Save {
        /// Schema JSON file.
        schema: String,
    },

    /// Run environment checks.
    Doctor,
}
