//! CLI rendering helpers.

use owo_colors::OwoColorize;

use crate::application::SyncStatus;
use crate::domain::{Session, WineId};
use crate::error::Error;
use crate::port::outbound::gateway::WineRecord;

pub fn success(message: &str) {
    println!("{} {message}", "ok:".green().bold());
}

pub fn notice(message: &str) {
    println!("{} {message}", "note:".yellow().bold());
}

/// Render an error the way the UI contract asks: blocking auth failures
/// get a prominent prefix, everything else is plain.
pub fn failure(error: &Error) {
    if error.is_blocking() {
        eprintln!("{} {error}", "error:".red().bold());
    } else {
        eprintln!("{error}");
    }
}

pub fn render_session(session: &Session) {
    match session.user() {
        Some(user) => {
            println!("{} {}", "logged in as".bold(), user.email);
            if let Some(name) = &user.display_name {
                println!("  name: {name}");
            }
            if let Some(id) = &user.id {
                println!("  id:   {id}");
            }
            println!("  role: {}", user.role);
        }
        None => println!("not logged in"),
    }
}

pub fn render_members(kind: &str, ids: &[WineId], status: &SyncStatus) {
    if let SyncStatus::Error(message) = status {
        notice(&format!("last sync failed: {message}"));
    }
    if ids.is_empty() {
        println!("{kind}: empty");
        return;
    }
    println!("{kind} ({}):", ids.len());
    for id in ids {
        println!("  {id}");
    }
}

pub fn render_wine(wine: &WineRecord) {
    let id = wine.id.as_deref().unwrap_or("?");
    let name = wine.name.as_deref().unwrap_or("(unnamed)");
    print!("{} {}", id.bold(), name);
    if let Some(winery) = &wine.winery {
        print!(" - {winery}");
    }
    if let Some(year) = wine.year {
        print!(" ({year})");
    }
    if let Some(rating) = wine.rating {
        print!(" [{rating:.1}]");
    }
    println!();
}
