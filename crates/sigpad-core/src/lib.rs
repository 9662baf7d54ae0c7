//! SigPad Core Library
//!
//! Platform-agnostic drawing surface, pointer state machine and PNG export
//! for the SigPad signature pad.

pub mod config;
pub mod export;
pub mod input;
pub mod pad;
pub mod session;
pub mod stroke;
pub mod surface;

pub use config::{ConfigError, PadConfig};
pub use export::{
    BoxFuture, EXPORT_FILE_NAME, EXPORT_MIME_TYPE, ExportError, ExportFile, ExportReport, Exporter,
    SaveOutcome, SaveTarget, encode_png,
};
#[cfg(not(target_arch = "wasm32"))]
pub use export::DownloadDirTarget;
pub use input::{EventResponse, InputState, PointerEvent, PointerKind, RawInput, TouchPhase};
pub use pad::SignaturePad;
pub use session::{Segment, Session};
pub use stroke::{Compositing, Mode, PenColor, StrokeParams};
pub use surface::{Surface, SurfaceError};
