use crate::commands::{begin, list, projects, summary, week};
use crate::track::record::TIME_FORMAT;
use crate::track::tracker::Tracker;
use anyhow::Result;
use std::io::{self, BufRead, Write};

fn print_menu() {
    println!();
    println!("     ---- available options -----");
    println!(" b - begin a project");
    println!(" d - delete the last record");
    println!(" e - end the current project");
    println!(" l - list weekly bills");
    println!(" n - new project");
    println!(" p - list projects");
    println!(" s - print summary");
    println!(" w - print week");
    println!(" q - quit");
}

fn prompt<L>(lines: &mut L, text: &str) -> Result<Option<String>>
where
    L: Iterator<Item = io::Result<String>>,
{
    print!("{text}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

fn pick_project<L>(tracker: &Tracker, lines: &mut L) -> Result<()>
where
    L: Iterator<Item = io::Result<String>>,
{
    let Some(pattern) = prompt(lines, "project name or part -->")? else {
        return Ok(());
    };
    if pattern.is_empty() {
        return Ok(());
    }

    let matches = tracker
        .project_names()
        .into_iter()
        .filter(|name| name.contains(&pattern))
        .collect::<Vec<_>>();
    match matches.as_slice() {
        [only] => begin::run(tracker, only),
        [] => {
            println!("nothing found for {pattern:?}; use `n` for a new project");
            Ok(())
        }
        many => {
            for name in many {
                print!(" {name},");
            }
            println!();
            Ok(())
        }
    }
}

fn confirm_delete<L>(tracker: &Tracker, lines: &mut L) -> Result<()>
where
    L: Iterator<Item = io::Result<String>>,
{
    let Some(last) = tracker.last_record() else {
        println!("nothing to delete");
        return Ok(());
    };
    let question = format!(
        "Delete record project='{}' started at {}?\n  (yes/No) -->",
        last.project,
        last.started.format(TIME_FORMAT)
    );
    let Some(answer) = prompt(lines, &question)? else {
        return Ok(());
    };
    if answer.starts_with(['y', 'Y']) {
        tracker.delete_last()?;
        println!("record deleted");
    }
    Ok(())
}

/// Line-based menu loop. Queued background messages are flushed between
/// prompts only, so they never interleave with pending input.
pub fn run(tracker: &Tracker) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    print_menu();
    loop {
        for message in tracker.messages().drain() {
            println!("{message}");
        }
        let Some(choice) = prompt(&mut lines, "-->")? else {
            break;
        };
        match choice.as_str() {
            "" => print_menu(),
            "q" | "Q" => break,
            "b" => {
                projects::run(tracker)?;
                pick_project(tracker, &mut lines)?;
            }
            "n" => {
                projects::run(tracker)?;
                if let Some(name) = prompt(&mut lines, "enter your new project:")? {
                    if !name.is_empty() {
                        begin::run(tracker, &name)?;
                    }
                }
            }
            "d" => confirm_delete(tracker, &mut lines)?,
            "e" => {
                tracker.end_project()?;
                println!("empty record written");
            }
            "l" => list::run(tracker)?,
            "p" => projects::run(tracker)?,
            "s" => summary::run(tracker)?,
            "w" => week::run(tracker)?,
            _ => {
                println!("option not recognized");
                print_menu();
            }
        }
    }
    Ok(())
}
