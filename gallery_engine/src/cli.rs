use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    /// Long corridor with paintings alternating between the side walls.
    Hall,
    /// Rectangular room around a rotating ring of paintings.
    Rotunda,
}

#[derive(Parser, Debug)]
#[command(
    about = "Headless host that drives the gallery navigation core",
    version
)]
pub struct Args {
    /// Path to a pipe-delimited painting catalog (built-in dataset when
    /// absent or unreadable)
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Directory to resolve painting images under
    #[arg(long)]
    pub assets_root: Option<PathBuf>,

    /// Room variant to build
    #[arg(long, value_enum, default_value = "hall")]
    pub variant: Variant,

    /// Run the scripted first-person walkthrough demo
    #[arg(long)]
    pub walk_demo: bool,

    /// Run the scripted turn demo (requires --variant rotunda)
    #[arg(long)]
    pub turn_demo: bool,

    /// Path to write per-tick movement samples as JSON (with a demo)
    #[arg(long)]
    pub movement_log_json: Option<PathBuf>,

    /// Path to write the drained event stream as JSON (with a demo)
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Print the catalog records and exit
    #[arg(long)]
    pub list_paintings: bool,
}

#[derive(Debug)]
pub enum Command {
    List(InspectArgs),
    Walk(DemoArgs),
    Turn(DemoArgs),
}

#[derive(Debug)]
pub struct InspectArgs {
    pub catalog: Option<PathBuf>,
    pub assets_root: Option<PathBuf>,
}

#[derive(Debug)]
pub struct DemoArgs {
    pub catalog: Option<PathBuf>,
    pub assets_root: Option<PathBuf>,
    pub variant: Variant,
    pub movement_log_json: Option<PathBuf>,
    pub event_log_json: Option<PathBuf>,
}

pub fn parse() -> Result<Command> {
    Args::parse().into_command()
}

impl Args {
    fn into_command(self) -> Result<Command> {
        if self.walk_demo && self.turn_demo {
            bail!("--walk-demo and --turn-demo are mutually exclusive");
        }
        if self.list_paintings && (self.walk_demo || self.turn_demo) {
            bail!("--list-paintings cannot be combined with a demo");
        }
        if self.turn_demo && self.variant != Variant::Rotunda {
            bail!("--turn-demo requires --variant rotunda");
        }
        if !self.walk_demo && !self.turn_demo {
            if self.movement_log_json.is_some() || self.event_log_json.is_some() {
                bail!("log paths are only written by a demo run");
            }
            return Ok(Command::List(InspectArgs {
                catalog: self.catalog,
                assets_root: self.assets_root,
            }));
        }

        let demo = DemoArgs {
            catalog: self.catalog,
            assets_root: self.assets_root,
            variant: self.variant,
            movement_log_json: self.movement_log_json,
            event_log_json: self.event_log_json,
        };
        if self.walk_demo {
            Ok(Command::Walk(demo))
        } else {
            Ok(Command::Turn(demo))
        }
    }

    #[cfg(test)]
    pub fn try_command(self) -> Result<Command> {
        self.into_command()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gallery_engine").chain(line.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn bare_invocation_lists_the_catalog() {
        let command = args(&[]).try_command().expect("command");
        assert!(matches!(command, Command::List(_)));
    }

    #[test]
    fn turn_demo_requires_the_rotunda() {
        let err = args(&["--turn-demo"]).try_command().expect_err("hall turn");
        assert!(err.to_string().contains("rotunda"));
        let command = args(&["--turn-demo", "--variant", "rotunda"])
            .try_command()
            .expect("command");
        assert!(matches!(command, Command::Turn(_)));
    }

    #[test]
    fn demos_are_mutually_exclusive() {
        assert!(
            args(&["--walk-demo", "--turn-demo", "--variant", "rotunda"])
                .try_command()
                .is_err()
        );
    }

    #[test]
    fn log_paths_need_a_demo() {
        assert!(
            args(&["--event-log-json", "events.json"])
                .try_command()
                .is_err()
        );
    }
}
