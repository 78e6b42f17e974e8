//! WebAssembly bindings for asciify

use crate::{AsciifyError, Charset, Converter, Setting};
use image::DynamicImage;
use wasm_bindgen::prelude::*;

fn to_js(err: AsciifyError) -> JsValue {
    let message = err.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

#[wasm_bindgen]
#[derive(Default)]
pub struct WasmConverter {
    converter: Converter,
}

#[wasm_bindgen]
impl WasmConverter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmConverter {
        WasmConverter::default()
    }

    #[wasm_bindgen]
    pub fn set_width(&mut self, width: u32) -> Result<(), JsValue> {
        self.update(Setting::Width(width))
    }

    #[wasm_bindgen]
    pub fn set_height_ratio(&mut self, ratio: f64) -> Result<(), JsValue> {
        self.update(Setting::HeightRatio(ratio))
    }

    #[wasm_bindgen]
    pub fn set_detail(&mut self, detail: f64) -> Result<(), JsValue> {
        self.update(Setting::Detail(detail))
    }

    #[wasm_bindgen]
    pub fn set_charset(&mut self, charset: &str) -> Result<(), JsValue> {
        let charset = Charset::new(charset).map_err(to_js)?;
        self.update(Setting::Charset(charset))
    }

    /// Apply a JSON object of settings, e.g. `{"width": 80, "detail": 0.5}`
    #[wasm_bindgen]
    pub fn update_settings(&mut self, json: &str) -> Result<(), JsValue> {
        self.converter.update_settings_json_str(json).map_err(to_js)
    }

    /// Current settings as a plain JS object
    #[wasm_bindgen]
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        let text = serde_json::to_string(self.converter.settings())
            .map_err(|e| to_js(e.into()))?;
        js_sys::JSON::parse(&text)
    }

    /// Convert canvas pixel data (RGBA, row-major) to newline-joined text
    #[wasm_bindgen]
    pub fn convert_rgba(&self, image_data: &[u8], width: u32, height: u32) -> Result<String, JsValue> {
        let img = image::RgbaImage::from_raw(width, height, image_data.to_vec()).ok_or_else(|| {
            to_js(AsciifyError::Conversion(format!(
                "{} bytes is not a {width}x{height} RGBA buffer",
                image_data.len()
            )))
        })?;
        self.convert(&DynamicImage::ImageRgba8(img))
    }

    /// Convert an encoded image file (PNG, JPEG, ...) to newline-joined text
    #[wasm_bindgen]
    pub fn convert_encoded(&self, bytes: &[u8]) -> Result<String, JsValue> {
        let img = image::load_from_memory(bytes).map_err(|e| to_js(e.into()))?;
        self.convert(&img)
    }
}

impl WasmConverter {
    fn update(&mut self, setting: Setting) -> Result<(), JsValue> {
        self.converter.update_settings([setting]).map_err(to_js)
    }

    fn convert(&self, image: &DynamicImage) -> Result<String, JsValue> {
        let art = self.converter.convert(image).map_err(to_js)?;
        Ok(art.to_string())
    }
}
