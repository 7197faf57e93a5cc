pub mod cli;
pub mod config;
pub mod extract;
pub mod keymap;
pub mod locator;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod opener;
pub mod page;
pub mod selection;
pub mod settings;
pub mod state;
pub mod ui;
pub mod workflow;
