//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `sticky_core` linkage without a UI.
//! - Summarize the notes file at the default location, read-only.
//! - Start file logging under the default log directory.
//!
//! # Invariants
//! - A logging setup failure is reported on stderr and never aborts the run.

use std::path::PathBuf;
use std::process::ExitCode;
use sticky_core::{
    core_version, default_log_dir, default_log_level, init_logging, LoggingError, NoteStore,
};

const PREVIEW_CHARS: usize = 40;

fn main() -> ExitCode {
    println!("sticky_core version={}", core_version());

    match start_logging(default_log_dir()) {
        Ok(Some(dir)) => println!("sticky_core logging=on dir={}", dir.display()),
        Ok(None) => eprintln!("sticky_core logging=off reason=no_data_dir"),
        Err(err) => eprintln!("sticky_core logging=off error={err}"),
    }

    let store = match NoteStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("sticky_core store=unavailable error={err}");
            return ExitCode::FAILURE;
        }
    };

    let notes = match store.try_load() {
        Ok(notes) => notes,
        Err(err) => {
            eprintln!("sticky_core path={} error={err}", store.path().display());
            return ExitCode::FAILURE;
        }
    };

    println!("sticky_core path={} notes={}", store.path().display(), notes.len());
    for note in &notes {
        let preview: String = note
            .content()
            .chars()
            .take(PREVIEW_CHARS)
            .map(|ch| if ch.is_control() { ' ' } else { ch })
            .collect();
        println!(
            "{} style={} size={}x{} tags={} modified={} {preview:?}",
            note.id(),
            note.style(),
            note.width(),
            note.height(),
            note.tag_count(),
            note.modified_at().to_rfc3339(),
        );
    }
    ExitCode::SUCCESS
}

/// Starts logging in `log_dir` at the default level.
///
/// Returns `Ok(None)` when there is no directory to log into.
fn start_logging(log_dir: Option<PathBuf>) -> Result<Option<PathBuf>, LoggingError> {
    let Some(dir) = log_dir else {
        return Ok(None);
    };
    init_logging(default_log_level(), &dir)?;
    Ok(Some(dir))
}
