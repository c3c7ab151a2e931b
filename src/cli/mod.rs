// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recipe-finder")]
#[command(about = "Recipe Finder - ingredient search with AI-written instructions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// List recipe names matching a partial query
    Suggest {
        /// Partial recipe name (at least 2 characters)
        query: String,
    },

    /// Search recipes by main ingredient
    Search {
        /// Ingredient, e.g. "chicken"
        ingredient: String,
    },

    /// Show a recipe with generated instructions
    Show {
        /// Recipe ID
        id: String,

        /// Generate instructions through a running server instead of calling the
        /// generator directly
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Interactive search session on the terminal
    Browse {
        /// Generate instructions through a running server
        #[arg(long)]
        proxy: Option<String>,
    },
}
