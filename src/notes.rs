//! Daily notes.
//!
//! Daily notes are markdown files named `YYYY-MM-DD.md` in the `Daily`
//! directory of the notes tree. Each note is split on its `### ` headings
//! into [`NoteChunk`]s, one per section, so sections can be handed to the
//! model as context on their own.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use time::Date;
use time::macros::format_description;

use crate::error::{Error, Result};
use crate::observability::{NOTES_FILES, NOTES_SECTIONS, NOTES_SKIPPED};

/// Directory below the notes root that holds daily notes.
pub const DAILY_DIR: &str = "Daily";

const NOTE_EXTENSION: &str = ".md";
const SECTION_PREFIX: &str = "### ";

/// One `### ` section of a daily note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChunk {
    pub date: Date,
    pub title: String,
    pub content: String,
}

impl NoteChunk {
    pub fn new(date: Date, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            date,
            title: title.into(),
            content: content.into(),
        }
    }

    /// `------- YYYY-MM-DD: title -------`
    pub fn header(&self) -> String {
        let date = self
            .date
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| self.date.to_string());
        format!("------- {date}: {} -------", self.title)
    }
}

impl fmt::Display for NoteChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        writeln!(f, "{header}")?;
        writeln!(f, "{}", self.content)?;
        write!(f, "{}", "-".repeat(header.chars().count()))
    }
}

/// Splits a note into its sections.
///
/// A section runs from its heading to the next heading or the end of the
/// note. Text before the first heading is not part of any section.
pub fn split_note(content: &str, date: Date) -> Vec<NoteChunk> {
    fn flush(chunks: &mut Vec<NoteChunk>, date: Date, title: String, body: &[&str]) {
        chunks.push(NoteChunk::new(date, title, body.join("\n").trim()));
    }

    let mut chunks = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    for line in content.lines() {
        if let Some(title) = line.strip_prefix(SECTION_PREFIX) {
            if let Some((title, body)) = current.take() {
                flush(&mut chunks, date, title, &body);
            }
            current = Some((title.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        flush(&mut chunks, date, title, &body);
    }
    chunks
}

/// Extracts the date from a daily note's file name (`YYYY-MM-DD.md`).
pub fn parse_note_date(file_name: &str) -> Option<Date> {
    let stem = file_name.strip_suffix(NOTE_EXTENSION)?;
    Date::parse(stem, format_description!("[year]-[month]-[day]")).ok()
}

/// The daily notes below a notes root.
#[derive(Debug, Clone)]
pub struct DailyNotes {
    dir: PathBuf,
}

impl DailyNotes {
    /// Daily notes of the notes tree rooted at `base_path`.
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            dir: base_path.as_ref().join(DAILY_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads every daily note in file-name order and splits it into sections.
    ///
    /// Entries that are not `YYYY-MM-DD.md` files are skipped with a warning.
    pub fn load(&self) -> Result<Vec<NoteChunk>> {
        let entries = fs::read_dir(&self.dir).map_err(|err| {
            Error::io(
                format!("failed to read notes directory {}", self.dir.display()),
                err,
            )
        })?;

        let mut notes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| {
                Error::io(
                    format!("failed to list notes directory {}", self.dir.display()),
                    err,
                )
            })?;
            let path = entry.path();
            let date = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(parse_note_date);
            match date {
                Some(date) if path.is_file() => notes.push((path, date)),
                _ => {
                    tracing::warn!(path = %path.display(), "skipping entry that is not a daily note");
                    NOTES_SKIPPED.click();
                }
            }
        }
        notes.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

        let mut chunks = Vec::new();
        for (path, date) in notes {
            let content = fs::read_to_string(&path).map_err(|err| {
                Error::io(format!("failed to read note {}", path.display()), err)
            })?;
            NOTES_FILES.click();
            let sections = split_note(&content, date);
            tracing::debug!(path = %path.display(), sections = sections.len(), "split note");
            NOTES_SECTIONS.count(sections.len() as u64);
            chunks.extend(sections);
        }
        Ok(chunks)
    }
}
