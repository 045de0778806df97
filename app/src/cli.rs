//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "invoice-templates", version, about = "Manage invoice layout templates")]
pub struct Cli {
    /// Application data directory (settings.json and template storage)
    #[arg(long, env = "INVOICE_TEMPLATES_DIR", default_value = ".invoice-templates", global = true)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed the default template on first run
    Init,
    /// List all templates, marking the active one
    List,
    /// Print a template as JSON
    Show { id: String },
    /// Print the resolved active template
    Active,
    /// Select the active template
    Use { id: String },
    /// Rename a template
    Rename { id: String, name: String },
    /// Apply a JSON patch file to a template
    Update { id: String, patch: PathBuf },
    /// Delete a template
    Delete { id: String },
    /// Copy a template under a new name
    Duplicate { id: String, name: String },
    /// Export a template to stdout or a file
    Export {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a template from a JSON file
    Import { file: PathBuf },
    /// Remove every template except the default
    Reset,
}
