// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// A bookmark manager for web resources and notes
pub struct Cli {
    /// Search bookmarks by title or content (case-sensitive)
    #[arg(short = 's', long = "search", value_name = "QUERY")]
    pub search: Option<String>,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Bookmark file to use instead of the configured one
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long = "no-color", help = "disable colored output")]
    pub no_color: bool,

    #[arg(long = "generate-config", help = "print default configuration as TOML")]
    pub generate_config: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a bookmark
    Add {
        /// URL or freeform note
        content: String,
        #[arg(
            short = 'n',
            long = "name",
            help = "title of the bookmark, fetched from the page when omitted"
        )]
        name: Option<String>,
    },
    /// List all bookmarks
    #[command(name = "ls")]
    List,
    /// Search bookmarks by title or content (case-sensitive)
    Search {
        /// Substring to look for
        query: String,
    },
    /// Delete every bookmark with the given title
    #[command(name = "rm")]
    Delete {
        /// Exact title
        title: String,
    },
}
