//! Image sources outside the canvas: file pickers and the clipboard.

/// Image data waiting to be placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingImport {
    /// Encoded image file bytes.
    Bytes(Vec<u8>),
    /// A `data:image/...;base64,` URL, as pasted text.
    DataUrl(String),
}

impl PendingImport {
    /// Treat pasted text as an import only if it is an image data URL.
    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        text.starts_with("data:image/").then(|| Self::DataUrl(text.to_string()))
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Option<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = match encoder.write_header() {
            Ok(w) => w,
            Err(e) => {
                log::error!("Failed to write PNG header: {:?}", e);
                return None;
            }
        };

        if let Err(e) = writer.write_image_data(rgba_data) {
            log::error!("Failed to write PNG data: {:?}", e);
            return None;
        }
    }

    Some(png_data)
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
mod native {
    use super::{PendingImport, encode_png};

    const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

    /// Show the native picker and read every chosen image file.
    pub fn pick_images() -> Vec<PendingImport> {
        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .set_title("Upload images")
            .pick_files()
        else {
            return Vec::new();
        };

        paths
            .into_iter()
            .filter_map(|path| match std::fs::read(&path) {
                Ok(bytes) => Some(PendingImport::Bytes(bytes)),
                Err(e) => {
                    log::warn!("Failed to read {}: {}", path.display(), e);
                    None
                }
            })
            .collect()
    }

    /// Read whatever image the clipboard holds: a bitmap first, then a data URL.
    pub fn paste_from_clipboard() -> Option<PendingImport> {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to access clipboard: {}", e);
                return None;
            }
        };

        if let Ok(image) = clipboard.get_image() {
            log::info!("Pasting clipboard bitmap ({}x{})", image.width, image.height);
            return encode_png(&image.bytes, image.width as u32, image.height as u32)
                .map(PendingImport::Bytes);
        }

        clipboard
            .get_text()
            .ok()
            .and_then(|text| PendingImport::from_text(&text))
    }
}

#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use native::{paste_from_clipboard, pick_images};

#[cfg(target_arch = "wasm32")]
mod web {
    use super::PendingImport;
    use std::cell::RefCell;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;

    thread_local! {
        static PENDING_IMPORTS: RefCell<Vec<PendingImport>> = const { RefCell::new(Vec::new()) };
    }

    fn push_pending(import: PendingImport) {
        PENDING_IMPORTS.with(|p| p.borrow_mut().push(import));
    }

    /// Imports that arrived since the last frame.
    pub fn take_pending_imports() -> Vec<PendingImport> {
        PENDING_IMPORTS.with(|p| std::mem::take(&mut *p.borrow_mut()))
    }

    async fn read_file(file: web_sys::File) -> Result<Vec<u8>, JsValue> {
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }

    fn queue_files(files: web_sys::FileList) {
        for i in 0..files.length() {
            let Some(file) = files.get(i) else { continue };
            if !file.type_().starts_with("image/") {
                log::warn!("Skipping non-image file {}", file.name());
                continue;
            }
            wasm_bindgen_futures::spawn_local(async move {
                match read_file(file).await {
                    Ok(bytes) => push_pending(PendingImport::Bytes(bytes)),
                    Err(e) => log::warn!("Failed to read file: {:?}", e),
                }
            });
        }
    }

    /// Listen for document paste events carrying image files or data URLs.
    pub fn setup_paste_listener() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, paste disabled");
            return;
        };

        let onpaste = Closure::wrap(Box::new(move |event: web_sys::ClipboardEvent| {
            let Some(data) = event.clipboard_data() else { return };
            match data.files() {
                Some(files) if files.length() > 0 => queue_files(files),
                _ => {
                    if let Some(import) = data
                        .get_data("text/plain")
                        .ok()
                        .and_then(|text| PendingImport::from_text(&text))
                    {
                        push_pending(import);
                    }
                }
            }
        }) as Box<dyn Fn(_)>);

        if let Err(e) =
            document.add_event_listener_with_callback("paste", onpaste.as_ref().unchecked_ref())
        {
            log::error!("Failed to register paste listener: {:?}", e);
        }
        onpaste.forget();
    }

    /// Open a hidden multi-file image input.
    pub fn trigger_file_input() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = document
            .create_element("input")
            .ok()
            .and_then(|e| e.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            log::error!("Failed to create file input");
            return;
        };

        input.set_type("file");
        input.set_accept("image/*");
        input.set_multiple(true);
        input.style().set_property("display", "none").ok();

        let input_clone = input.clone();
        let onchange = Closure::once(Box::new(move |_event: web_sys::Event| {
            if let Some(files) = input_clone.files() {
                queue_files(files);
            }
            input_clone.remove();
        }) as Box<dyn FnOnce(_)>);

        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        if let Some(body) = document.body() {
            body.append_child(&input).ok();
            input.click();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{setup_paste_listener, take_pending_imports, trigger_file_input};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_image_data_urls_import() {
        assert_eq!(
            PendingImport::from_text("  data:image/png;base64,AAAA\n"),
            Some(PendingImport::DataUrl("data:image/png;base64,AAAA".into()))
        );
        assert_eq!(PendingImport::from_text("hello"), None);
        assert_eq!(PendingImport::from_text("data:text/plain;base64,AAAA"), None);
    }

    #[test]
    fn test_encoded_bitmap_is_png() {
        let rgba = [255u8, 0, 0, 255].repeat(4);
        let png = encode_png(&rgba, 2, 2).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_short_buffer_fails() {
        assert!(encode_png(&[0u8; 3], 2, 2).is_none());
    }
}
