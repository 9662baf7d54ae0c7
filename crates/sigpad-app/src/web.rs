//! WebAssembly entry point and browser save targets.

use js_sys::{Array, Function, Object, Promise, Reflect};
use sigpad_core::export::{BoxFuture, ExportFile, SaveOutcome, SaveTarget};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Read a property from a JS object.
fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
}

/// Call a method on a JS object and await the promise it returns.
async fn call_async(target: &JsValue, method: &str, args: &Array) -> Result<JsValue, JsValue> {
    let function: Function = get(target, method)?.dyn_into()?;
    let promise: Promise = function.apply(target, args)?.dyn_into()?;
    JsFuture::from(promise).await
}

/// Whether a rejection is the user dismissing a dialog.
fn is_abort(error: &JsValue) -> bool {
    get(error, "name")
        .ok()
        .and_then(|name| name.as_string())
        .is_some_and(|name| name == "AbortError")
}

/// Saves through the File System Access API save picker.
pub struct FilePickerTarget;

impl FilePickerTarget {
    async fn save_with_picker(file: &ExportFile) -> Result<String, JsValue> {
        let window: JsValue = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))?
            .into();

        let accept = Object::new();
        Reflect::set(
            &accept,
            &JsValue::from_str(file.mime_type),
            &Array::of1(&JsValue::from_str(".png")),
        )?;
        let file_type = Object::new();
        Reflect::set(&file_type, &"description".into(), &"PNG Image".into())?;
        Reflect::set(&file_type, &"accept".into(), &accept)?;

        let options = Object::new();
        Reflect::set(&options, &"suggestedName".into(), &JsValue::from_str(&file.name))?;
        Reflect::set(&options, &"types".into(), &Array::of1(&file_type))?;

        let handle = call_async(&window, "showSaveFilePicker", &Array::of1(&options)).await?;
        let writable = call_async(&handle, "createWritable", &Array::new()).await?;

        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(file.mime_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&Array::of1(&bytes), &options)?;

        call_async(&writable, "write", &Array::of1(&blob)).await?;
        call_async(&writable, "close", &Array::new()).await?;

        Ok(get(&handle, "name")?
            .as_string()
            .unwrap_or_else(|| file.name.clone()))
    }
}

impl SaveTarget for FilePickerTarget {
    fn name(&self) -> &'static str {
        "save file picker"
    }

    fn is_supported(&self) -> bool {
        web_sys::window()
            .map(|window| Reflect::has(&window, &"showSaveFilePicker".into()).unwrap_or(false))
            .unwrap_or(false)
    }

    fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome> {
        Box::pin(async move {
            match Self::save_with_picker(file).await {
                Ok(name) => SaveOutcome::Saved(name),
                Err(e) if is_abort(&e) => SaveOutcome::Cancelled,
                Err(e) => SaveOutcome::Failed(format!("{:?}", e)),
            }
        })
    }
}

/// Triggers a browser download through a temporary anchor with a data URL.
pub struct AnchorDownloadTarget;

impl AnchorDownloadTarget {
    fn download(file: &ExportFile) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;

        let anchor = document
            .create_element("a")?
            .dyn_into::<web_sys::HtmlAnchorElement>()?;
        anchor.set_href(&file.data_url());
        anchor.set_download(&file.name);
        anchor.click();
        Ok(())
    }
}

impl SaveTarget for AnchorDownloadTarget {
    fn name(&self) -> &'static str {
        "anchor download"
    }

    fn is_supported(&self) -> bool {
        web_sys::window().and_then(|window| window.document()).is_some()
    }

    fn save<'a>(&'a self, file: &'a ExportFile) -> BoxFuture<'a, SaveOutcome> {
        Box::pin(async move {
            match Self::download(file) {
                Ok(()) => SaveOutcome::Saved(format!("browser download ({})", file.name)),
                Err(e) => SaveOutcome::Failed(format!("{:?}", e)),
            }
        })
    }
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub async fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(log::Level::Info).expect("Failed to initialize logger");

    log::info!("Starting SigPad (WASM)");

    crate::App::run().await;
}
