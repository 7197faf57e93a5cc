use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "hnav",
    version,
    about = "Keyboard navigation and a save-for-later list for link aggregator front pages.",
    long_about = None
)]
pub struct Cli {
    /// Open the saved-entries popup instead of a listing page
    #[clap(short = 's', long)]
    pub saved: bool,

    /// Print the stories found on the page and exit
    #[clap(short, long)]
    pub dump: bool,

    /// Print the saved entries and exit
    #[clap(short = 'l', long)]
    pub list_saved: bool,

    /// Remove every saved entry and exit
    #[clap(long)]
    pub clear_saved: bool,

    /// Use a specific configuration file
    #[clap(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable debug output
    #[clap(long)]
    pub debug: bool,

    /// Listing page URL or local HTML file
    #[clap(name = "PAGE")]
    pub page: Option<String>,
}

impl Cli {
    /// Modes that print and exit instead of taking over the terminal.
    pub fn is_one_shot(&self) -> bool {
        self.dump || self.list_saved || self.clear_saved
    }
}
