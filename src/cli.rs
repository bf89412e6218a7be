use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::track::config::load_config;
use crate::track::paths::resolve_paths;
use crate::track::tracker::Tracker;

/// Track worked time per project and bill it in half-hour steps.
///
/// Without a subcommand an interactive menu is started; `timewatch <name>`
/// begins work on `<name>` directly.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start work on the named project.
    Begin { name: String },
    /// Delete the most recently logged record.
    Delete,
    /// End the current project with an empty boundary record.
    End,
    /// List billed work per week and day.
    List,
    /// Print the known project names.
    Projects,
    /// Print the current week summary.
    Summary,
    /// Print the per-project matrix of the newest week.
    Week,
    #[command(external_subcommand)]
    Start(Vec<String>),
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let paths = resolve_paths()?;
    let config = load_config(&paths)?;
    let tracker = Tracker::open(paths, config)?;
    let messages = tracker.messages();

    match args.command {
        None => commands::interactive::run(&tracker)?,
        Some(Command::Begin { name }) => commands::begin::run(&tracker, &name)?,
        Some(Command::Delete) => commands::delete::run(&tracker)?,
        Some(Command::End) => commands::end::run(&tracker)?,
        Some(Command::List) => commands::list::run(&tracker)?,
        Some(Command::Projects) => commands::projects::run(&tracker)?,
        Some(Command::Summary) => commands::summary::run(&tracker)?,
        Some(Command::Week) => commands::week::run(&tracker)?,
        Some(Command::Start(words)) => {
            let name = words.join(" ");
            commands::begin::run(&tracker, &name)?;
        }
    }

    tracker.shutdown();
    for message in messages.drain() {
        println!("{message}");
    }
    Ok(())
}
