use hnav::{
    cli::Cli,
    config::{Config, get_app_data_prefix},
    extract::extract,
    locator::locate,
    logging::{self, LogDestination, LogLevel},
    page::{Fetcher, Location},
    settings::Settings,
    state::{ListStore, State},
    ui::{navigator::Navigator, popup::Popup},
    workflow::{clear_entries, load_entries},
};

use clap::Parser;
use eyre::Result;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "configuration.json";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = LogLevel::from_flags(cli.verbose, cli.debug);
    if cli.is_one_shot() {
        logging::init(level, LogDestination::Stderr);
    } else if let Ok(prefix) = get_app_data_prefix() {
        logging::init(level, LogDestination::File(&prefix.join("hnav.log")));
    }

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path.clone()),
        None => Config::new(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Warning: Could not load configuration: {}", err);
            eprintln!("Starting with default settings");
            let filepath = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            Config::with_settings(Settings::default(), filepath)
        }
    };

    if cli.dump {
        dump_stories(&cli, &config)
    } else if cli.list_saved {
        list_saved(&State::new()?)
    } else if cli.clear_saved {
        clear_saved(&State::new()?)
    } else if cli.saved {
        Popup::new(&config, State::new()?).run()
    } else {
        let location = start_location(&cli, &config)?;
        let mut navigator = Navigator::new(&config, State::new()?, location)?;
        navigator.run()
    }
}

fn start_location(cli: &Cli, config: &Config) -> Result<Location> {
    let input = cli
        .page
        .as_deref()
        .unwrap_or(config.settings.front_page.as_str());
    Location::parse(input)
}

fn dump_stories(cli: &Cli, config: &Config) -> Result<()> {
    let location = start_location(cli, config)?;
    let fetcher = Fetcher::new(&config.settings.site_host)?;
    let page = fetcher.fetch(&location)?;

    let rows = locate(&page);
    if rows.is_empty() {
        println!("No stories found");
        return Ok(());
    }

    for (i, row) in rows.into_iter().enumerate() {
        match extract(&page, row) {
            Some(story) => {
                println!("{:>3}. {}", i + 1, story.title);
                println!("     {}", story.url);
                println!("     {}", story.discussion_link);
            }
            None => println!("{:>3}. (no link)", i + 1),
        }
    }
    Ok(())
}

fn list_saved(store: &dyn ListStore) -> Result<()> {
    let entries = load_entries(store);
    if entries.is_empty() {
        println!("No saved entries");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {}",
            entry.saved_at.format("%Y-%m-%d %H:%M"),
            entry.title
        );
        println!("    {}", entry.url);
    }
    Ok(())
}

fn clear_saved(store: &dyn ListStore) -> Result<()> {
    let count = store.get()?.len();
    clear_entries(store)?;
    println!("Removed {} saved entries", count);
    Ok(())
}
