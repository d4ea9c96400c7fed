use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_CORPUS_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_CORPUS_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// An ordered, immutable sequence of text lines.
///
/// Workers borrow the corpus for the duration of one search; nothing mutates it
/// after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
    source: Option<PathBuf>,
}

impl Corpus {
    /// Builds a corpus from already-decoded lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            source: None,
        }
    }

    /// Splits text on `\n` / `\r\n`. A trailing newline does not add an empty line.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// Loads a corpus from a file, failing on invalid UTF-8
    pub fn load(path: impl AsRef<Path>) -> SearchResult<Self> {
        CorpusLoader::new(EncodingMode::FailFast).load(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at a 0-based index
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// File the corpus was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Decodes raw corpus bytes according to the encoding mode
fn decode_bytes<'a>(
    bytes: &'a [u8],
    path: &Path,
    encoding_mode: EncodingMode,
) -> SearchResult<Cow<'a, str>> {
    match encoding_mode {
        EncodingMode::FailFast => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| SearchError::corpus_unavailable(path, format!("invalid UTF-8: {}", e))),
        EncodingMode::Lossy => {
            let cow = String::from_utf8_lossy(bytes);
            // Owned means at least one invalid sequence was replaced
            if let Cow::Owned(_) = cow {
                warn!("Invalid UTF-8 replaced in corpus: {}", path.display());
            }
            Ok(cow)
        }
    }
}

fn open_error(path: &Path, e: std::io::Error) -> SearchError {
    match e.kind() {
        std::io::ErrorKind::NotFound => SearchError::corpus_unavailable(path, "file not found"),
        std::io::ErrorKind::PermissionDenied => {
            SearchError::corpus_unavailable(path, "permission denied")
        }
        _ => SearchError::corpus_unavailable(path, e),
    }
}

/// Reads corpus files from disk, picking a read strategy by file size
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    encoding_mode: EncodingMode,
    metrics: SearchMetrics,
}

impl CorpusLoader {
    pub fn new(encoding_mode: EncodingMode) -> Self {
        Self::with_metrics(encoding_mode, SearchMetrics::new())
    }

    pub fn with_metrics(encoding_mode: EncodingMode, metrics: SearchMetrics) -> Self {
        Self {
            encoding_mode,
            metrics,
        }
    }

    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    /// Loads the file at `path` into a [`Corpus`].
    ///
    /// Every failure is reported as [`SearchError::CorpusUnavailable`].
    pub fn load(&self, path: &Path) -> SearchResult<Corpus> {
        trace!("Loading corpus: {}", path.display());

        let metadata = path.metadata().map_err(|e| open_error(path, e))?;
        if metadata.is_dir() {
            return Err(SearchError::corpus_unavailable(path, "is a directory"));
        }
        let size = metadata.len();
        self.metrics.record_corpus_load(size);

        let lines = if size < SMALL_CORPUS_THRESHOLD {
            self.load_small(path)?
        } else if size >= LARGE_CORPUS_THRESHOLD {
            self.load_mmap(path)?
        } else {
            self.load_buffered(path)?
        };

        debug!("Loaded {} lines ({} bytes) from {}", lines.len(), size, path.display());
        Ok(Corpus {
            lines,
            source: Some(path.to_path_buf()),
        })
    }

    fn split(&self, bytes: &[u8], path: &Path) -> SearchResult<Vec<String>> {
        let contents = decode_bytes(bytes, path, self.encoding_mode)?;
        Ok(contents.lines().map(str::to_owned).collect())
    }

    fn load_small(&self, path: &Path) -> SearchResult<Vec<String>> {
        let bytes = std::fs::read(path).map_err(|e| open_error(path, e))?;
        self.split(&bytes, path)
    }

    fn load_buffered(&self, path: &Path) -> SearchResult<Vec<String>> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| SearchError::corpus_unavailable(path, e))?;
        self.split(&bytes, path)
    }

    fn load_mmap(&self, path: &Path) -> SearchResult<Vec<String>> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        // SAFETY: the map is read-only and dropped before this function returns.
        let mmap =
            unsafe { Mmap::map(&file) }.map_err(|e| SearchError::corpus_unavailable(path, e))?;
        self.split(&mmap, path)
    }
}

impl Default for CorpusLoader {
    fn default() -> Self {
        Self::new(EncodingMode::default())
    }
}
