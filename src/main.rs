use std::io::{self, BufRead};
use rayon::ThreadPoolBuilder;
use anyhow::{anyhow, Result};
use log::{info, warn};
use crate::initialization::{init, ConsoleWidget};

mod config;
mod data_store;
mod host;
mod initialization;
mod logging;
mod manager_forecast;
mod models;
mod widget;
mod wind_chill;

fn main() -> Result<()> {
    // Refreshes run on the global pool, one at a time
    ThreadPoolBuilder::new().num_threads(2).build_global()?;

    // Load config and set up the widget. If initialization fails we can't even log.
    let (location, mut widget) = match init() {
        Ok((l, w)) => (l, w),
        Err(e) => {
            return Err(anyhow!("Initialization failed: {}", e));
        }
    };

    widget.on_create(location);
    println!("enter: toggle menu, r: refresh, loc <lat> <long>: move, q: quit");

    for line in io::stdin().lock().lines() {
        if !handle_command(&mut widget, line?.trim()) {
            break;
        }
    }

    widget.on_removed();
    info!("exiting");

    Ok(())
}

/// Dispatches one console command to the widget, returns false when the user quits
///
/// # Arguments
///
/// * 'widget' - the widget to control
/// * 'command' - one line of input
fn handle_command(widget: &mut ConsoleWidget, command: &str) -> bool {
    let mut words = command.split_whitespace();
    match words.next() {
        None => widget.on_clicked(),
        Some("q") | Some("quit") => return false,
        Some("r") => widget.refresh(),
        Some("loc") => {
            let coords = words.map(str::parse::<f64>).collect::<Result<Vec<f64>, _>>();
            match coords.as_deref() {
                Ok([lat, long]) => match widget.set_location(*lat, *long) {
                    Ok(()) => widget.refresh(),
                    Err(e) => warn!("{}", e),
                },
                _ => println!("usage: loc <lat> <long>"),
            }
        }
        Some(other) => println!("unknown command: {}", other),
    }

    true
}
