//! Jellyfish handle exported to the rendering layer.
//!
//! Static buffers are copied out once; the live position buffers can either be
//! copied per frame or read in place through `positions_ptr` on the module's
//! linear memory.

use jelly_core::animation::FrameUniforms;
use jelly_core::jellyfish::Jellyfish;
use jelly_core::ring::RingRecord;
use jelly_core::settings::JellyfishSettings;
use js_sys::Float32Array;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmJellyfish {
    inner: Jellyfish,
}

/// Missing settings fall back to defaults; a partial object fills the rest.
pub(crate) fn parse_settings(value: JsValue) -> Result<JellyfishSettings, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(JellyfishSettings::default());
    }
    from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid jellyfish settings: {}", e)))
}

impl WasmJellyfish {
    pub(crate) fn from_settings(settings: JellyfishSettings) -> Result<Self, String> {
        Jellyfish::build(settings)
            .map(|inner| Self { inner })
            .map_err(|err| format!("{err:#}"))
    }

    pub(crate) fn advance(&mut self, dt: f32) -> Result<FrameUniforms, String> {
        if !dt.is_finite() || dt < 0.0 {
            return Err("dt must be finite and non-negative.".to_string());
        }
        self.inner.advance(dt).map_err(|err| format!("{err:#}"))
    }
}

#[wasm_bindgen]
impl WasmJellyfish {
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<WasmJellyfish, JsValue> {
        console_error_panic_hook::set_once();
        let settings = parse_settings(settings)?;
        Self::from_settings(settings).map_err(|e| JsValue::from_str(&e))
    }

    /// Advances one frame and returns `{ phase, time }` for the shaders.
    pub fn step(&mut self, dt: f32) -> Result<JsValue, JsValue> {
        let uniforms = self.advance(dt).map_err(|e| JsValue::from_str(&e))?;
        to_value(&uniforms).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn phase(&self) -> f32 {
        self.inner.uniforms().phase
    }

    pub fn time(&self) -> f32 {
        self.inner.uniforms().time
    }

    /// Completed frames. Renderers re-upload positions when this changes.
    pub fn frame(&self) -> f64 {
        self.inner.frame() as f64
    }

    pub fn particle_count(&self) -> usize {
        self.inner.buffers().positions.len() / 3
    }

    /// Byte offset of the position buffer in linear memory. Valid until the
    /// next call that mutates this handle.
    pub fn positions_ptr(&self) -> usize {
        self.inner.buffers().positions.as_ptr() as usize
    }

    pub fn positions_prev_ptr(&self) -> usize {
        self.inner.buffers().positions_prev.as_ptr() as usize
    }

    /// Number of `f32` values behind either position pointer.
    pub fn positions_len(&self) -> usize {
        self.inner.buffers().positions.len()
    }

    pub fn positions(&self) -> Float32Array {
        Float32Array::from(self.inner.buffers().positions)
    }

    pub fn positions_prev(&self) -> Float32Array {
        Float32Array::from(self.inner.buffers().positions_prev)
    }

    pub fn uvs(&self) -> Vec<f32> {
        self.inner.buffers().uvs.to_vec()
    }

    pub fn links(&self) -> Vec<u32> {
        self.inner.buffers().links.to_vec()
    }

    pub fn inner_links(&self) -> Vec<u32> {
        self.inner.buffers().inner_links.to_vec()
    }

    pub fn bulb_faces(&self) -> Vec<u32> {
        self.inner.buffers().bulb_faces.to_vec()
    }

    pub fn tail_faces(&self) -> Vec<u32> {
        self.inner.buffers().tail_faces.to_vec()
    }

    /// Bulb then tail ring records, for diagnostic views.
    pub fn rings(&self) -> Result<JsValue, JsValue> {
        let rings: Vec<RingRecord> = self.inner.rings().copied().collect();
        to_value(&rings).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_value(self.inner.settings())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
