//! Bulk tagging of every note in a store.
//!
//! Notes are processed strictly one at a time, in the order the store
//! enumerates them. A failure on one note is logged and recorded, and the run
//! moves on to the next note.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::frontmatter::apply_tags;
use crate::host::{NoteStore, Notifier};
use crate::models::{Note, NotePath};
use crate::settings::Settings;
use crate::suggester::TagSuggester;

/// Notes with fewer trimmed characters than this are skipped.
pub const MIN_NOTE_CHARS: usize = 50;

/// A progress notice is shown after this many processed notes.
pub const PROGRESS_INTERVAL: usize = 10;

/// A note whose pipeline failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: NotePath,
    pub message: String,
}

/// Outcome of a bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Notes whose pipeline completed, whether or not tags were written.
    pub processed: usize,
    /// Notes whose file was rewritten with new tags.
    pub applied: usize,
    /// Notes skipped for being too short.
    pub skipped: usize,
    /// Notes whose pipeline failed.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// One-line summary shown at the end of a run.
    pub fn summary(&self) -> String {
        format!(
            "Processed {} notes ({} tagged, {} skipped, {} failed)",
            self.processed,
            self.applied,
            self.skipped,
            self.failures.len()
        )
    }
}

/// What happened to a single note.
enum NoteOutcome {
    Applied,
    Discarded,
}

/// Suggests tags for every note in `store`.
///
/// When `settings.auto_apply` is set, non-empty suggestions are merged into
/// each note's header and written back; otherwise they are discarded.
///
/// # Errors
///
/// Returns an error only if the notes cannot be enumerated. Per-note failures
/// are reported in [`BatchReport::failures`].
pub fn run_all(
    store: &dyn NoteStore,
    suggester: &TagSuggester,
    settings: &Settings,
    notifier: &dyn Notifier,
) -> Result<BatchReport> {
    let paths = store.list_notes().context("Failed to enumerate notes")?;
    info!(count = paths.len(), auto_apply = settings.auto_apply, "starting bulk tagging");

    let mut report = BatchReport::default();

    for path in paths {
        let content = match store.read_note(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(note = %path, "failed to read note: {}", e);
                report.failures.push(BatchFailure {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let note = Note::new(path, content);
        if note.trimmed_len() < MIN_NOTE_CHARS {
            debug!(note = %note.path(), "skipping short note");
            report.skipped += 1;
            continue;
        }

        match process_note(store, suggester, settings, &note) {
            Ok(outcome) => {
                report.processed += 1;
                if matches!(outcome, NoteOutcome::Applied) {
                    report.applied += 1;
                }
                if report.processed % PROGRESS_INTERVAL == 0 {
                    notifier.notice(&format!("Processed {} notes...", report.processed));
                }
            }
            Err(e) => {
                warn!(note = %note.path(), "failed to tag note: {:#}", e);
                report.failures.push(BatchFailure {
                    path: note.path,
                    message: format!("{e:#}"),
                });
            }
        }
    }

    info!(
        processed = report.processed,
        applied = report.applied,
        failed = report.failures.len(),
        "bulk tagging finished"
    );
    notifier.notice(&report.summary());

    Ok(report)
}

fn process_note(
    store: &dyn NoteStore,
    suggester: &TagSuggester,
    settings: &Settings,
    note: &Note,
) -> Result<NoteOutcome> {
    let tags = suggester.suggest(note.content(), settings)?;

    if tags.is_empty() || !settings.auto_apply {
        debug!(note = %note.path(), count = tags.len(), "suggestion not applied");
        return Ok(NoteOutcome::Discarded);
    }

    let updated = apply_tags(note.content(), &tags);
    store
        .write_note(note.path(), &updated)
        .context("Failed to write note")?;

    debug!(note = %note.path(), tags = ?tags, "applied tags");
    Ok(NoteOutcome::Applied)
}
