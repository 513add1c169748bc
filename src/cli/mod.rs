//! CLI module - Command-line interface for anigraph
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ExportFormat;

/// anigraph - Anime metadata normalizer
/// Turns catalog XML documents into typed records and relation graphs
#[derive(Parser)]
#[command(name = "anigraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a summary of one anime document
    #[command(alias = "s")]
    Show {
        /// Path to the XML document
        path: PathBuf,
    },

    /// Normalize one document and write it in another format
    #[command(alias = "e")]
    Export {
        /// Path to the XML document
        path: PathBuf,
        /// Output format (defaults to the configured one)
        #[arg(long, short, value_enum)]
        format: Option<ExportFormat>,
        /// Output file (defaults to `<output_dir>/<id>.<ext>`)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Build the relation graph spanned by several documents
    #[command(alias = "g")]
    Graph {
        /// Paths to the XML documents
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output file (prints to stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Create default config file
    Init,
}

pub use commands::*;
