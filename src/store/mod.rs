//! BibTeX library store
//!
//! File-based persistence for the record collection: one `references.bib`
//! holding the entries, a `PAPERS` folder with one PDF per entry key, a
//! `PICKUP` folder watched for incoming `.bib` files, and a `TRASH` folder
//! for consumed pickups. Entry keys are re-derived on every load as
//! `<surname><year><title prefix>` so PDFs and entries stay linked by name.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use biblatex::{Bibliography, Chunk, Spanned};
use glob::glob;
use thiserror::Error;
use tracing::{debug, info};

use crate::record::{KEY_FIELD, PDF_ABSENT, PDF_FIELD, PDF_PRESENT, Record};

/// Errors from library persistence and the external viewer/clipboard hooks.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bibliography file failed to parse
    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Invalid glob pattern (library path contains wildcard metacharacters)
    #[error("bad library path: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The selected entry has no linked document
    #[error("no pdf linked to this entry")]
    NoAttachment,

    /// Clipboard backend unavailable or rejected the write
    #[error("clipboard error: {0}")]
    Clipboard(String),
}

/// Counts reported by [`Library::pickup`].
#[derive(Debug, Default, Clone, Copy)]
pub struct PickupReport {
    /// Entries appended to the library.
    pub added: usize,
    /// Entries skipped as duplicates (same key or same title).
    pub skipped: usize,
    /// Pickup files consumed.
    pub files: usize,
}

/// Handle to the on-disk paper library.
#[derive(Debug, Clone)]
pub struct Library {
    bib_file: PathBuf,
    papers_dir: PathBuf,
    pickup_dir: PathBuf,
    trash_dir: PathBuf,
    title_include: usize,
    viewer: Option<String>,
}

impl Library {
    /// Open (and lay out, if missing) the library under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the folders or the bibliography file
    /// cannot be created.
    pub fn open(
        root: &Path,
        title_include: usize,
        viewer: Option<String>,
    ) -> Result<Self, StoreError> {
        let library = Self {
            bib_file: root.join("references.bib"),
            papers_dir: root.join("PAPERS"),
            pickup_dir: root.join("PICKUP"),
            trash_dir: root.join("TRASH"),
            title_include,
            viewer,
        };

        fs::create_dir_all(root)?;
        fs::create_dir_all(&library.papers_dir)?;
        fs::create_dir_all(&library.pickup_dir)?;
        fs::create_dir_all(&library.trash_dir)?;
        if !library.bib_file.exists() {
            fs::write(&library.bib_file, "")?;
        }
        Ok(library)
    }

    /// Load the library: parse, re-key, and mark linked PDFs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] when the bibliography file is not valid
    /// BibTeX, or [`StoreError::Io`] when it cannot be read.
    pub fn load(&self) -> Result<Vec<Record>, StoreError> {
        let content = fs::read_to_string(&self.bib_file)?;
        let mut records = if content.trim().is_empty() {
            Vec::new()
        } else {
            parse_bibtex(&content, &self.bib_file)?
        };
        rename_entries(&mut records, self.title_include);
        self.mark_attachments(&mut records);
        info!(entries = records.len(), "library loaded");
        Ok(records)
    }

    /// Persist the records back to the bibliography file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written.
    pub fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        fs::write(&self.bib_file, to_bibtex(records))?;
        info!(entries = records.len(), "library saved");
        Ok(())
    }

    /// Absorb `.bib` files from the pickup folder, appending non-duplicate
    /// entries and moving consumed files to trash.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] for an unreadable pickup file; already
    /// absorbed files stay absorbed.
    pub fn pickup(&self, records: &mut Vec<Record>) -> Result<PickupReport, StoreError> {
        let mut report = PickupReport::default();
        let pattern = self.pickup_dir.join("*.bib");

        for path in glob(&pattern.to_string_lossy())?.flatten() {
            debug!(path = %path.display(), "picking up");
            let content = fs::read_to_string(&path)?;
            let mut incoming = parse_bibtex(&content, &path)?;
            rename_entries(&mut incoming, self.title_include);

            for entry in incoming {
                let duplicate = records.iter().any(|existing| {
                    existing.key() == entry.key()
                        || (existing.get("title").is_some()
                            && existing.get("title") == entry.get("title"))
                });
                if duplicate {
                    report.skipped += 1;
                } else {
                    records.push(entry);
                    report.added += 1;
                }
            }

            if let Some(name) = path.file_name() {
                fs::rename(&path, self.trash_dir.join(name))?;
            }
            report.files += 1;
        }

        self.mark_attachments(records);
        Ok(report)
    }

    /// Where the entry's PDF would live.
    #[must_use]
    pub fn attachment_path(&self, record: &Record) -> PathBuf {
        self.papers_dir.join(format!("{}.pdf", record.key()))
    }

    /// Number of documents in the papers folder.
    #[must_use]
    pub fn document_count(&self) -> usize {
        let pattern = self.papers_dir.join("*.pdf");
        glob(&pattern.to_string_lossy())
            .map(|paths| paths.flatten().count())
            .unwrap_or(0)
    }

    /// Launch the configured viewer on the entry's PDF, detached with its
    /// output discarded; without a configured viewer, hand the file to the
    /// platform opener.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoAttachment`] when no PDF is linked, or
    /// [`StoreError::Io`] when the viewer cannot be spawned.
    pub fn open_attachment(&self, record: &Record) -> Result<(), StoreError> {
        let path = self.attachment_path(record);
        if !path.is_file() {
            return Err(StoreError::NoAttachment);
        }
        match &self.viewer {
            Some(viewer) => {
                Command::new(viewer)
                    .arg(&path)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()?;
                Ok(())
            }
            None => Ok(open::that_detached(&path)?),
        }
    }

    fn mark_attachments(&self, records: &mut [Record]) {
        for record in records {
            let marker = if self.papers_dir.join(format!("{}.pdf", record.key())).is_file() {
                PDF_PRESENT
            } else {
                PDF_ABSENT
            };
            record.set(PDF_FIELD, marker);
        }
    }
}

/// Put text on the system clipboard.
///
/// # Errors
///
/// Returns [`StoreError::Clipboard`] when no clipboard backend is available.
pub fn copy_to_clipboard(text: &str) -> Result<(), StoreError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| StoreError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text)
        .map_err(|e| StoreError::Clipboard(e.to_string()))
}

fn parse_bibtex(content: &str, path: &Path) -> Result<Vec<Record>, StoreError> {
    let bibliography = Bibliography::parse(content).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut records = Vec::new();
    for entry in bibliography.iter() {
        let mut record = Record::new(entry.entry_type.to_string());
        record.set(KEY_FIELD, entry.key.clone());
        for (name, chunks) in &entry.fields {
            record.set(name.clone(), chunks_to_string(chunks));
        }
        records.push(record);
    }
    Ok(records)
}

/// Convert biblatex chunks to a plain string.
fn chunks_to_string(chunks: &[Spanned<Chunk>]) -> String {
    chunks
        .iter()
        .map(|c| match &c.v {
            Chunk::Normal(s) => s.as_str(),
            Chunk::Verbatim(s) => s.as_str(),
            Chunk::Math(s) => s.as_str(),
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Re-derive entry keys as `<first author surname><year><title prefix>`,
/// alphanumerics only. Entries missing any of the three fields keep their
/// parsed key.
fn rename_entries(records: &mut [Record], title_include: usize) {
    for record in records {
        let (Some(author), Some(title), Some(year)) = (
            record.get("author"),
            record.get("title"),
            record.get("year"),
        ) else {
            continue;
        };

        let mut title_part: String = title.replace(['{', '}'], "").trim().replace(' ', "");
        if title_part.chars().count() > title_include {
            title_part = title_part.chars().take(title_include).collect();
        }

        let key: String = format!("{}{}{}", first_author(author), year, title_part)
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        record.set(KEY_FIELD, key);
    }
}

/// First author's surname from a BibTeX author field
/// (`"Last, First and Last, First ..."`).
fn first_author(author: &str) -> String {
    author
        .replace(['{', '}'], "")
        .split(',')
        .next()
        .unwrap_or("")
        .split(" and ")
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

fn to_bibtex(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("@{}{{{},\n", record.entry_type(), record.key()));
        for (name, value) in record.fields() {
            if name == KEY_FIELD || name == PDF_FIELD {
                continue;
            }
            out.push_str(&format!("  {name} = {{{value}}},\n"));
        }
        out.push_str("}\n\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
@article{temp1,
  author = {Doe, Jane and Roe, Richard},
  title = {Maps of Nothing},
  year = {2019},
  journal = {Imaginary Letters},
  tags = {foo,bar},
}

@book{temp2,
  author = {Poe, Edgar},
  title = {Sets Considered Harmful},
  year = {2021},
}
"#;

    fn library(root: &Path) -> Library {
        Library::open(root, 0, None).unwrap()
    }

    #[test]
    fn test_open_lays_out_folders() {
        let dir = TempDir::new().unwrap();
        let lib = library(dir.path());

        assert!(dir.path().join("PAPERS").is_dir());
        assert!(dir.path().join("PICKUP").is_dir());
        assert!(dir.path().join("TRASH").is_dir());
        assert!(dir.path().join("references.bib").is_file());
        assert!(lib.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_parses_and_rekeys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = library(dir.path());

        let records = lib.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key(), "Doe2019");
        assert_eq!(records[1].key(), "Poe2021");
        assert_eq!(records[0].get("journal"), Some("Imaginary Letters"));
        assert_eq!(records[0].tags(), vec!["foo", "bar"]);
        assert!(!records[0].has_attachment());
    }

    #[test]
    fn test_title_prefix_in_keys() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = Library::open(dir.path(), 4, None).unwrap();

        let records = lib.load().unwrap();
        assert_eq!(records[0].key(), "Doe2019Maps");
        assert_eq!(records[1].key(), "Poe2021Sets");
    }

    #[test]
    fn test_attachment_marking() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = library(dir.path());
        fs::write(dir.path().join("PAPERS/Doe2019.pdf"), "%PDF").unwrap();

        let records = lib.load().unwrap();
        assert!(records[0].has_attachment());
        assert!(!records[1].has_attachment());
        assert_eq!(lib.document_count(), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = library(dir.path());

        let records = lib.load().unwrap();
        lib.save(&records).unwrap();
        let reloaded = lib.load().unwrap();

        assert_eq!(records.len(), reloaded.len());
        for (before, after) in records.iter().zip(&reloaded) {
            assert_eq!(before.key(), after.key());
            assert_eq!(before.get("title"), after.get("title"));
            assert_eq!(before.get("author"), after.get("author"));
        }
    }

    #[test]
    fn test_pickup_skips_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = library(dir.path());
        let mut records = lib.load().unwrap();

        let incoming = r#"
@article{other1,
  author = {Doe, Jane},
  title = {Maps of Nothing},
  year = {2019},
}

@article{other2,
  author = {New, Nancy},
  title = {Entirely Fresh Results},
  year = {2024},
}
"#;
        fs::write(dir.path().join("PICKUP/in.bib"), incoming).unwrap();

        let report = lib.pickup(&mut records).unwrap();
        assert_eq!(report.files, 1);
        assert_eq!(report.added, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].key(), "New2024");

        // Consumed file lands in trash.
        assert!(!dir.path().join("PICKUP/in.bib").exists());
        assert!(dir.path().join("TRASH/in.bib").exists());
    }

    #[test]
    fn test_missing_attachment_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("references.bib"), SAMPLE).unwrap();
        let lib = library(dir.path());
        let records = lib.load().unwrap();

        assert!(matches!(
            lib.open_attachment(&records[0]),
            Err(StoreError::NoAttachment)
        ));
    }

    #[test]
    fn test_first_author_extraction() {
        assert_eq!(first_author("Doe, Jane and Roe, Richard"), "Doe");
        assert_eq!(first_author("{van der Berg}, Anna"), "van der Berg");
        assert_eq!(first_author("Solo"), "Solo");
    }
}
