use std::io;

/// External fetcher for breakpoint override text.
///
/// Implementations resolve a path- or URL-like reference to a raw text blob
/// (typically a stylesheet defining the threshold variables). Errors are not
/// fatal to the caller: [`Breakpoints::load`](crate::Breakpoints::load)
/// treats any fetch failure as an empty document.
pub trait OverrideSource {
    fn fetch(&self) -> impl Future<Output = io::Result<String>>;
}

/// Reads override text from a file on disk.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct FileSource {
    path: std::path::PathBuf,
}

#[cfg(feature = "tokio")]
impl FileSource {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(feature = "tokio")]
impl OverrideSource for FileSource {
    async fn fetch(&self) -> io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }
}

#[cfg(all(test, feature = "tokio"))]
mod tests {
    use std::io::Write;

    use super::FileSource;
    use crate::breakpoints::Breakpoints;

    fn block_on<F: Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn file_overrides_are_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "$mdScreenWidth: 1024px;").unwrap();

        let mut bps = Breakpoints::default();
        block_on(bps.load(Some(&FileSource::new(file.path()))));

        assert_eq!(bps.md_screen_width, 1024.0);
        assert_eq!(bps.sm_screen_width, 600.0);
    }

    #[test]
    fn missing_file_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("does-not-exist.scss"));

        let mut bps = Breakpoints::default();
        block_on(bps.load(Some(&source)));

        assert_eq!(bps, Breakpoints::default());
    }
}
