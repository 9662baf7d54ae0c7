//! Direct write into a downloads directory.

use super::{BoxFuture, ExportFile, SaveOutcome, SaveTarget};
use super::EXPORT_FILE_NAME;
use std::path::{Path, PathBuf};

/// Writes the export straight into a directory without asking.
///
/// Used as the fallback when no interactive picker is available.
pub struct DownloadDirTarget {
    dir: Option<PathBuf>,
}

impl DownloadDirTarget {
    /// Write into a specific directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir: Some(dir) }
    }

    /// The user's downloads directory, or the home directory when the
    /// platform has no downloads folder.
    ///
    /// On Linux: `~/Downloads` (XDG_DOWNLOAD_DIR)
    /// On macOS: `~/Downloads`
    /// On Windows: `{FOLDERID_Downloads}`
    pub fn default_location() -> Self {
        Self {
            dir: dirs::download_dir().or_else(dirs::home_dir),
        }
    }
}

/// Final component of `name`, so a write never leaves the target directory.
/// Names without a usable component, or without a `.png` extension, fall
/// back to `signature.png`.
fn local_file_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| {
            Path::new(n)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
        })
        .unwrap_or(EXPORT_FILE_NAME)
}

impl SaveTarget for DownloadDirTarget {
    fn name(&self) -> &'static str {
        "download directory"
    }

    fn is_supported(&self) -> bool {
        self.dir.is_some()
    }

    fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome> {
        Box::pin(async move {
            let Some(dir) = &self.dir else {
                return SaveOutcome::Unsupported;
            };
            if let Err(e) = std::fs::create_dir_all(dir) {
                return SaveOutcome::Failed(format!("Failed to create {}: {}", dir.display(), e));
            }
            let path = dir.join(local_file_name(&file.name));
            match std::fs::write(&path, &file.bytes) {
                Ok(()) => SaveOutcome::Saved(path.display().to_string()),
                Err(e) => SaveOutcome::Failed(format!("Failed to write {}: {}", path.display(), e)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::{block_on, decode_png};
    use crate::export::Exporter;
    use crate::surface::Surface;
    use tempfile::tempdir;

    fn blank_file() -> ExportFile {
        let surface = Surface::new(16, 8).unwrap();
        ExportFile::from_surface(&surface).unwrap()
    }

    #[test]
    fn test_writes_named_png() {
        let dir = tempdir().unwrap();
        let target = DownloadDirTarget::new(dir.path().to_path_buf());
        assert!(target.is_supported());

        let outcome = block_on(target.save(&blank_file()));
        let path = dir.path().join("signature.png");
        assert_eq!(outcome, SaveOutcome::Saved(path.display().to_string()));

        let bytes = std::fs::read(&path).unwrap();
        let (width, height, rgba) = decode_png(&bytes);
        assert_eq!((width, height), (16, 8));
        assert!(rgba.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_name_cannot_escape_directory() {
        let dir = tempdir().unwrap();
        let inner = dir.path().join("downloads");
        let target = DownloadDirTarget::new(inner.clone());

        let mut file = blank_file();
        file.name = "../escaped.png".to_string();
        let outcome = block_on(target.save(&file));
        assert_eq!(
            outcome,
            SaveOutcome::Saved(inner.join("escaped.png").display().to_string())
        );
        assert!(!dir.path().join("escaped.png").exists());

        file.name = "../escaped.txt".to_string();
        let outcome = block_on(target.save(&file));
        assert_eq!(
            outcome,
            SaveOutcome::Saved(inner.join("signature.png").display().to_string())
        );
        assert!(!dir.path().join("escaped.txt").exists());
    }

    #[test]
    fn test_local_file_name() {
        assert_eq!(local_file_name("signature.png"), "signature.png");
        assert_eq!(local_file_name("/tmp/sig.PNG"), "sig.PNG");
        assert_eq!(local_file_name(".."), "signature.png");
        assert_eq!(local_file_name(""), "signature.png");
        assert_eq!(local_file_name("notes.txt"), "signature.png");
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("out");
        let target = DownloadDirTarget::new(nested.clone());

        let outcome = block_on(target.save(&blank_file()));
        assert!(outcome.is_saved());
        assert!(nested.join("signature.png").exists());
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let dir = tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let target = DownloadDirTarget::new(blocker);

        let outcome = block_on(target.save(&blank_file()));
        assert!(matches!(outcome, SaveOutcome::Failed(_)));
    }

    #[test]
    fn test_missing_location_is_unsupported() {
        let target = DownloadDirTarget { dir: None };
        assert!(!target.is_supported());

        let dir = tempdir().unwrap();
        let exporter = Exporter::new(
            Box::new(target),
            Box::new(DownloadDirTarget::new(dir.path().to_path_buf())),
        );
        let report = block_on(exporter.export(&blank_file()));
        assert_eq!(report.primary, SaveOutcome::Unsupported);
        assert!(report.succeeded());
    }
}
