// crates/conformance-corpus/src/loader.rs
// ============================================================================
// Module: Corpus Loader
// Description: Capability-scoped walk of the corpus directory.
// Purpose: Build the corpus index, document texts, and present-file set.
// Dependencies: cap-std, cap-primitives, conformance-core
// ============================================================================

//! ## Overview
//! The loader opens the corpus root once as a capability handle and never
//! leaves it: entries are opened relative to their parent directory without
//! following symlinks, and any symlink inside the corpus is an error. Every
//! file with the configured extension is read (up to the per-document byte
//! limit), parsed, and recorded by its `/`-separated corpus-relative path.
//! Documents are returned sorted by path so load order does not depend on
//! directory iteration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;
use conformance_core::CorpusIndex;
use conformance_core::DocumentText;
use conformance_core::FileSet;
use conformance_core::TestId;

use crate::document::parse_document;
use crate::error::CorpusError;

// ============================================================================
// SECTION: Loaded Corpus
// ============================================================================

/// Everything the checker and aggregator need from the corpus directory.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    /// Parsed test cases sorted by path.
    pub corpus: CorpusIndex,
    /// Raw text of each document, aligned with `corpus`.
    pub texts: Vec<DocumentText>,
    /// Corpus-relative paths of every document on disk.
    pub present_files: FileSet,
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Loads test documents from a corpus root.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    /// Corpus root directory.
    root: PathBuf,
    /// Document extension without the dot.
    extension: String,
    /// Per-document size limit in bytes.
    max_document_bytes: usize,
}

impl CorpusLoader {
    /// Default per-document size limit.
    pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 256 * 1024;

    /// Creates a loader for `root` matching files with `extension`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            max_document_bytes: Self::DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }

    /// Overrides the per-document size limit.
    #[must_use]
    pub const fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    /// Returns the corpus root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the corpus root and parses every matching document.
    ///
    /// # Errors
    ///
    /// Returns [`CorpusError`] when the root cannot be opened, the corpus
    /// contains a symlink, or any document fails to read or parse.
    pub fn load(&self) -> Result<LoadedCorpus, CorpusError> {
        let root = Dir::open_ambient_dir(&self.root, ambient_authority())
            .map_err(|_| CorpusError::Path(self.root.clone()))?;
        let mut paths = Vec::new();
        self.collect_documents(&root, Path::new(""), &mut paths)?;
        paths.sort();

        let mut cases = Vec::with_capacity(paths.len());
        let mut texts = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = self.read_document(&root, path)?;
            let case = parse_document(path, &text)?;
            texts.push(DocumentText {
                id: TestId::from_path(path)?,
                path: path.clone(),
                text,
            });
            cases.push(case);
        }
        Ok(LoadedCorpus {
            corpus: CorpusIndex::new(cases),
            texts,
            present_files: FileSet::new(paths),
        })
    }

    /// Recursively collects document paths relative to the corpus root.
    fn collect_documents(
        &self,
        current: &Dir,
        prefix: &Path,
        paths: &mut Vec<String>,
    ) -> Result<(), CorpusError> {
        let entries = current.entries().map_err(|err| CorpusError::Io(err.to_string()))?;
        for entry in entries {
            let entry = entry.map_err(|err| CorpusError::Io(err.to_string()))?;
            let file_name = entry.file_name();
            let relative = if prefix.as_os_str().is_empty() {
                PathBuf::from(&file_name)
            } else {
                prefix.join(&file_name)
            };
            let normalized = normalize(&relative)?;
            let file_type = entry.file_type().map_err(|err| CorpusError::Io(err.to_string()))?;
            if file_type.is_symlink() {
                return Err(CorpusError::Symlink(normalized));
            }
            if file_type.is_dir() {
                let directory = entry.open_dir().map_err(|err| CorpusError::Io(err.to_string()))?;
                self.collect_documents(&directory, &relative, paths)?;
            } else if file_type.is_file()
                && relative.extension().is_some_and(|ext| ext == self.extension.as_str())
            {
                paths.push(normalized);
            }
        }
        Ok(())
    }

    /// Reads one document without following symlinks, enforcing the size limit.
    fn read_document(&self, root: &Dir, path: &str) -> Result<String, CorpusError> {
        let mut options = OpenOptions::new();
        options.read(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        let mut file =
            root.open_with(path, &options).map_err(|err| CorpusError::Io(err.to_string()))?;
        let size = file.metadata().map_err(|err| CorpusError::Io(err.to_string()))?.len();
        let max = u64::try_from(self.max_document_bytes).unwrap_or(u64::MAX);
        if size > max {
            return Err(CorpusError::TooLarge {
                path: path.to_string(),
                size,
                max: self.max_document_bytes,
            });
        }
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|err| CorpusError::Io(err.to_string()))?;
        String::from_utf8(bytes).map_err(|_| CorpusError::NotUtf8(path.to_string()))
    }
}

/// Converts a relative path into its `/`-separated UTF-8 form.
fn normalize(relative: &Path) -> Result<String, CorpusError> {
    let text = relative.to_str().ok_or_else(|| CorpusError::Path(relative.to_path_buf()))?;
    Ok(text.replace('\\', "/"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
