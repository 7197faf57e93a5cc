//! Hands URLs to the system browser.

use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use eyre::Result;

pub trait Opener {
    fn open(&self, url: &str) -> Result<()>;
}

/// Launches `browser`, or the platform's default handler when it is "auto".
#[derive(Debug, Clone)]
pub struct SystemOpener {
    browser: String,
}

impl SystemOpener {
    pub fn new(browser: &str) -> Self {
        Self {
            browser: browser.trim().to_string(),
        }
    }

    /// The configured browser command for `url`, or `None` for the platform
    /// default.
    fn command(&self, url: &str) -> Option<Command> {
        let mut parts = self.browser.split_whitespace();
        let program = parts.next().filter(|program| *program != "auto")?;
        let mut command = Command::new(program);
        command
            .args(parts)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        Some(command)
    }
}

/// Start `command` and wait for it on a background thread so the child is
/// reaped without blocking the caller.
fn launch(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child: Child = command.spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

impl Opener for SystemOpener {
    fn open(&self, url: &str) -> Result<()> {
        match self.command(url) {
            Some(command) => {
                log::info!("opening {url} with {:?}", command.get_program());
                launch(command)?;
            }
            None => {
                log::info!("opening {url} with the system handler");
                open::that(url)?;
            }
        }
        Ok(())
    }
}
