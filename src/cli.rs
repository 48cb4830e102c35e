use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Rescale recipe ingredient quantities", long_about = None)]
pub struct Cli {
    /// Directory holding the saved recipe and templates (overrides RECIPE_SCALER_DATA_DIR)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add an ingredient; omit COUNT for "to taste"
    Add {
        name: String,
        count: Option<String>,
        unit: Option<String>,
    },
    /// Remove an ingredient by exact name
    Remove { name: String },
    /// Set the recipe title
    Rename { title: String },
    /// Remove every ingredient
    Clear {
        /// Confirm clearing the recipe
        #[arg(long)]
        yes: bool,
    },
    /// Print the current recipe
    Show,
    /// Print the recipe rescaled by a ratio or by portions
    Scale(ScaleArgs),
    /// Add an ingredient from a line like "мука 200 г" or "соль по вкусу"
    Say {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Add every ingredient line of a text file
    Import { file: PathBuf },
    /// Manage named templates
    #[command(subcommand)]
    Template(TemplateCommand),
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("by").required(true).args(["ratio", "from"])))]
pub struct ScaleArgs {
    /// Multiply every quantity by this factor
    #[arg(short, long)]
    pub ratio: Option<f64>,

    /// Portions the recipe is written for
    #[arg(long, requires = "to")]
    pub from: Option<f64>,

    /// Portions wanted
    #[arg(long, requires = "from")]
    pub to: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// Save the current recipe under NAME
    Save { name: String },
    /// Replace the current recipe with a template
    Load { name: String },
    /// List template names
    List,
    /// Delete a template
    Remove { name: String },
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
