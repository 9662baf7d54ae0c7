//! PNG export and the save strategies that deliver it.
//!
//! Export runs in two steps: the surface is encoded synchronously into an
//! owned [`ExportFile`], then an [`Exporter`] offers that file to a primary
//! [`SaveTarget`] (an interactive destination picker) and, if that does not
//! succeed, to a best-effort fallback.

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::DownloadDirTarget;

use crate::surface::Surface;
use base64::Engine;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// File name offered to the user.
pub const EXPORT_FILE_NAME: &str = "signature.png";
/// MIME type of the exported file.
pub const EXPORT_MIME_TYPE: &str = "image/png";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Pad has no surface to export")]
    Unmounted,
}

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// An encoded image ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Encode the full surface, transparent regions included, as `signature.png`.
    pub fn from_surface(surface: &Surface) -> Result<Self, ExportError> {
        let bytes = encode_png(&surface.to_rgba8(), surface.width(), surface.height())?;
        Ok(Self {
            name: EXPORT_FILE_NAME.to_string(),
            mime_type: EXPORT_MIME_TYPE,
            width: surface.width(),
            height: surface.height(),
            bytes,
        })
    }

    /// `data:` URL carrying the file contents.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| ExportError::Encode(format!("Failed to write PNG data: {}", e)))?;
    }
    Ok(png_data)
}

/// Result of one save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written; carries a description of the destination.
    Saved(String),
    /// The mechanism is not available in this environment.
    Unsupported,
    /// The user or environment declined the save.
    Cancelled,
    Failed(String),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// A way of delivering an exported file to the user.
pub trait SaveTarget {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this mechanism exists in the current environment.
    fn is_supported(&self) -> bool;

    /// Deliver the file.
    fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome>;
}

/// What happened during one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub primary: SaveOutcome,
    /// Present only when the primary target did not save.
    pub fallback: Option<SaveOutcome>,
}

impl ExportReport {
    /// Whether either step saved the file.
    pub fn succeeded(&self) -> bool {
        self.primary.is_saved() || self.fallback.as_ref().is_some_and(SaveOutcome::is_saved)
    }

    /// Destination of the successful save, if any.
    pub fn destination(&self) -> Option<&str> {
        [Some(&self.primary), self.fallback.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|outcome| match outcome {
                SaveOutcome::Saved(dest) => Some(dest.as_str()),
                _ => None,
            })
    }
}

/// Runs a capability check on the primary target, then falls back.
pub struct Exporter {
    primary: Box<dyn SaveTarget>,
    fallback: Box<dyn SaveTarget>,
}

impl Exporter {
    pub fn new(primary: Box<dyn SaveTarget>, fallback: Box<dyn SaveTarget>) -> Self {
        Self { primary, fallback }
    }

    /// Offer the file to the primary target, then to the fallback.
    ///
    /// Never fails: every outcome is logged and reported.
    pub async fn export(&self, file: &ExportFile) -> ExportReport {
        let primary = attempt(self.primary.as_ref(), file).await;
        match &primary {
            SaveOutcome::Saved(dest) => {
                log::info!("Exported {} to {}", file.name, dest);
                return ExportReport {
                    primary,
                    fallback: None,
                };
            }
            SaveOutcome::Unsupported => {
                log::info!("{} unavailable, using {}", self.primary.name(), self.fallback.name());
            }
            SaveOutcome::Cancelled => {
                log::info!("{} cancelled, using {}", self.primary.name(), self.fallback.name());
            }
            SaveOutcome::Failed(e) => {
                log::warn!("{} failed: {}", self.primary.name(), e);
            }
        }

        let fallback = attempt(self.fallback.as_ref(), file).await;
        match &fallback {
            SaveOutcome::Saved(dest) => log::info!("Exported {} to {}", file.name, dest),
            other => log::error!("Error saving file via {}: {:?}", self.fallback.name(), other),
        }

        ExportReport {
            primary,
            fallback: Some(fallback),
        }
    }
}

async fn attempt(target: &dyn SaveTarget, file: &ExportFile) -> SaveOutcome {
    if !target.is_supported() {
        return SaveOutcome::Unsupported;
    }
    target.save(file).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stroke::{Mode, StrokeParams};
    use kurbo::Point;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker { dummy_raw_waker() }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    /// Target with a scripted outcome that records what it was given.
    struct ScriptedTarget {
        supported: bool,
        outcome: SaveOutcome,
        calls: Rc<Cell<usize>>,
        received: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedTarget {
        fn new(supported: bool, outcome: SaveOutcome) -> (Self, Rc<Cell<usize>>) {
            let calls = Rc::new(Cell::new(0));
            let target = Self {
                supported,
                outcome,
                calls: calls.clone(),
                received: Rc::new(RefCell::new(Vec::new())),
            };
            (target, calls)
        }
    }

    impl SaveTarget for ScriptedTarget {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn is_supported(&self) -> bool {
            self.supported
        }

        fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome> {
            self.calls.set(self.calls.get() + 1);
            self.received.borrow_mut().push(file.name.clone());
            let outcome = self.outcome.clone();
            Box::pin(async move { outcome })
        }
    }

    fn sample_file() -> ExportFile {
        let mut surface = Surface::new(60, 20).unwrap();
        surface.stroke_segment(
            Point::new(10.0, 10.0),
            Point::new(50.0, 10.0),
            &StrokeParams::for_mode(Mode::Draw),
        );
        ExportFile::from_surface(&surface).unwrap()
    }

    pub(crate) fn decode_png(bytes: &[u8]) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn test_export_file_metadata() {
        let file = sample_file();
        assert_eq!(file.name, "signature.png");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!((file.width, file.height), (60, 20));
        assert_eq!(&file.bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_png_keeps_dimensions_and_transparency() {
        let file = sample_file();
        let (width, height, rgba) = decode_png(&file.bytes);
        assert_eq!((width, height), (60, 20));

        // Top-left corner stays transparent, the stroke is opaque black
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
        let idx = ((10 * 60 + 30) * 4) as usize;
        assert_eq!(rgba[idx + 3], 255);
    }

    #[test]
    fn test_data_url_prefix() {
        let file = sample_file();
        let url = file.data_url();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_primary_success_skips_fallback() {
        let (primary, primary_calls) = ScriptedTarget::new(true, SaveOutcome::Saved("picked".into()));
        let (fallback, fallback_calls) = ScriptedTarget::new(true, SaveOutcome::Saved("dl".into()));
        let exporter = Exporter::new(Box::new(primary), Box::new(fallback));

        let report = block_on(exporter.export(&sample_file()));
        assert_eq!(report.primary, SaveOutcome::Saved("picked".into()));
        assert_eq!(report.fallback, None);
        assert_eq!(report.destination(), Some("picked"));
        assert_eq!(primary_calls.get(), 1);
        assert_eq!(fallback_calls.get(), 0);
    }

    #[test]
    fn test_unsupported_primary_is_not_called() {
        let (primary, primary_calls) = ScriptedTarget::new(false, SaveOutcome::Saved("picked".into()));
        let (fallback, fallback_calls) = ScriptedTarget::new(true, SaveOutcome::Saved("dl".into()));
        let exporter = Exporter::new(Box::new(primary), Box::new(fallback));

        let report = block_on(exporter.export(&sample_file()));
        assert_eq!(report.primary, SaveOutcome::Unsupported);
        assert_eq!(report.fallback, Some(SaveOutcome::Saved("dl".into())));
        assert!(report.succeeded());
        assert_eq!(primary_calls.get(), 0);
        assert_eq!(fallback_calls.get(), 1);
    }

    #[test]
    fn test_cancelled_primary_falls_back() {
        let (primary, _) = ScriptedTarget::new(true, SaveOutcome::Cancelled);
        let (fallback, fallback_calls) = ScriptedTarget::new(true, SaveOutcome::Saved("dl".into()));
        let exporter = Exporter::new(Box::new(primary), Box::new(fallback));

        let report = block_on(exporter.export(&sample_file()));
        assert_eq!(report.primary, SaveOutcome::Cancelled);
        assert_eq!(report.destination(), Some("dl"));
        assert_eq!(fallback_calls.get(), 1);
    }

    #[test]
    fn test_failed_primary_falls_back() {
        let (primary, _) = ScriptedTarget::new(true, SaveOutcome::Failed("denied".into()));
        let (fallback, _) = ScriptedTarget::new(true, SaveOutcome::Saved("dl".into()));
        let exporter = Exporter::new(Box::new(primary), Box::new(fallback));

        let report = block_on(exporter.export(&sample_file()));
        assert!(report.succeeded());
    }

    #[test]
    fn test_fallback_failure_is_reported_not_raised() {
        let (primary, _) = ScriptedTarget::new(true, SaveOutcome::Failed("denied".into()));
        let (fallback, _) = ScriptedTarget::new(true, SaveOutcome::Failed("blocked".into()));
        let exporter = Exporter::new(Box::new(primary), Box::new(fallback));

        let report = block_on(exporter.export(&sample_file()));
        assert!(!report.succeeded());
        assert_eq!(report.destination(), None);
        assert_eq!(report.fallback, Some(SaveOutcome::Failed("blocked".into())));
    }
}
