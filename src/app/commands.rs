//! Command handlers
//!
//! The explicit registry behind the shell's dispatch: every command name
//! maps to a typed handler taking the argument rest of the line and
//! returning which pane gets focus next. Unknown names never reach this
//! table; dispatch reports them on the output line.

use std::collections::HashMap;

use tracing::warn;

use crate::BibrError;
use crate::app::{App, PaneId, Transition};
use crate::query::Query;
use crate::store;

/// Typed handler signature shared by every command.
pub type Handler = fn(&mut App, &str) -> Result<Transition, BibrError>;

/// Build the command table.
#[must_use]
pub fn registry() -> HashMap<&'static str, Handler> {
    let mut table: HashMap<&'static str, Handler> = HashMap::new();
    table.insert("load", cmd_load);
    table.insert("save", cmd_save);
    table.insert("list", cmd_list);
    table.insert("shell", cmd_shell);
    table.insert("search", cmd_search);
    table.insert("open", cmd_open);
    table.insert("stat", cmd_stat);
    table.insert("clip", cmd_clip);
    table.insert("pickup", cmd_pickup);
    table.insert("quit", cmd_exit);
    table.insert("exit", cmd_exit);
    table
}

/// Reload the library from disk; the subset resets to all entries.
fn cmd_load(app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    let records = app.library.load()?;
    app.output = format!(
        "{} ({} pdfs) bibtex entries loaded",
        records.len(),
        app.library.document_count()
    );
    app.browse.set_records(records);
    app.search.clear();
    Ok(Transition::To(PaneId::Command))
}

/// Persist the current records.
fn cmd_save(app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    app.library.save(app.browse.records())?;
    app.output = "library saved".to_string();
    Ok(Transition::Stay)
}

/// Give the list focus.
fn cmd_list(_app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    Ok(Transition::To(PaneId::Browse))
}

/// Enter the command line, optionally prefilled.
fn cmd_shell(app: &mut App, args: &str) -> Result<Transition, BibrError> {
    if !args.trim().is_empty() {
        app.command.prefill(args);
    }
    Ok(Transition::To(PaneId::Command))
}

/// Filter the list through the query engine. A parse failure only aborts
/// this search; the previous subset stays as it was.
fn cmd_search(app: &mut App, args: &str) -> Result<Transition, BibrError> {
    app.search = args.trim().to_string();
    match Query::parse(args) {
        Ok(query) => {
            let subset = query.filter(app.browse.records());
            app.output = format!("{} matches", subset.len());
            app.browse.set_subset(subset);
        }
        Err(err) => {
            warn!(query = args, %err, "search rejected");
            app.output = format!("search error: {err}");
        }
    }
    Ok(Transition::To(PaneId::Browse))
}

/// Open the attachment of the entry at the given subset index, defaulting
/// to the current selection.
fn cmd_open(app: &mut App, args: &str) -> Result<Transition, BibrError> {
    let args = args.trim();
    let index = if args.is_empty() {
        app.browse.index()
    } else {
        match args.parse() {
            Ok(index) => index,
            Err(_) => {
                app.output = format!("cannot convert '{args}' to index");
                return Ok(Transition::To(PaneId::Browse));
            }
        }
    };

    match app.browse.record_at(index) {
        None => app.output = "index out of range".to_string(),
        Some(record) => {
            if let Err(err) = app.library.open_attachment(record) {
                app.output = err.to_string();
            }
        }
    }
    Ok(Transition::To(PaneId::Browse))
}

/// Report library and view counts.
fn cmd_stat(app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    app.output = format!(
        "{} entries, {} in view, {} documents",
        app.browse.records().len(),
        app.browse.subset().len(),
        app.library.document_count()
    );
    Ok(Transition::Stay)
}

/// Copy the selected entry's key to the clipboard.
fn cmd_clip(app: &mut App, args: &str) -> Result<Transition, BibrError> {
    let args = args.trim();
    let index = if args.is_empty() {
        app.browse.index()
    } else {
        match args.parse() {
            Ok(index) => index,
            Err(_) => {
                app.output = format!("cannot convert '{args}' to index");
                return Ok(Transition::Stay);
            }
        }
    };

    match app.browse.record_at(index) {
        None => app.output = "index out of range".to_string(),
        Some(record) => {
            let key = record.key().to_string();
            match store::copy_to_clipboard(&key) {
                Ok(()) => app.output = format!("copied {key} to clipboard"),
                Err(err) => app.output = err.to_string(),
            }
        }
    }
    Ok(Transition::Stay)
}

/// Absorb `.bib` files from the pickup folder and persist the result.
fn cmd_pickup(app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    let mut records = app.browse.records().to_vec();
    match app.library.pickup(&mut records) {
        Ok(report) if report.files == 0 => {
            app.output = "pickup folder empty".to_string();
        }
        Ok(report) => {
            app.library.save(&records)?;
            app.browse.set_records(records);
            app.search.clear();
            app.output = format!(
                "added {} entries, skipped {} duplicates",
                report.added, report.skipped
            );
        }
        Err(err) => {
            warn!(%err, "pickup failed");
            app.output = err.to_string();
        }
    }
    Ok(Transition::Stay)
}

/// Persist and leave.
fn cmd_exit(app: &mut App, _args: &str) -> Result<Transition, BibrError> {
    app.library.save(app.browse.records())?;
    Ok(Transition::Exit)
}
