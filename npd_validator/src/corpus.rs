use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

const PROGRAM_EXTENSION: &str = "c";

/// One test program: its path, corpus-relative name and source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    path: PathBuf,
    filename: String,
    source: String,
}

impl CorpusEntry {
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

fn corpus_error(path: &Path) -> impl FnOnce(std::io::Error) -> HarnessError + '_ {
    move |source| HarnessError::Corpus {
        path: path.to_path_buf(),
        source,
    }
}

/// Lists the `*.c` files directly inside `dir`, sorted by file name, with
/// their contents loaded. Sources that are not valid UTF-8 are read lossily.
pub fn discover(dir: &Path) -> Result<Vec<CorpusEntry>, HarnessError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(corpus_error(dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .map(|ext| ext == PROGRAM_EXTENSION)
                .unwrap_or(false)
        })
        .collect();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let entries = paths
        .into_iter()
        .map(|path| {
            let bytes = fs::read(&path).map_err(corpus_error(&path))?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let source = String::from_utf8_lossy(&bytes).into_owned();
            Ok(CorpusEntry::new(path, filename, source))
        })
        .collect::<Result<Vec<_>, HarnessError>>()?;

    if entries.is_empty() {
        return Err(HarnessError::EmptyCorpus(dir.to_path_buf()));
    }
    log::debug!("discovered {} programs in {}", entries.len(), dir.display());
    Ok(entries)
}
