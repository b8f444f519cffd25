//! WASM bridge for Sketch Studio: exposes the annotation controller to the
//! browser page hosting the sketch canvas.
//!
//! Compiled via `wasm-pack build --target web`. Coordinates passed in are
//! client (viewport) coordinates; the controller maps them into the
//! surface or container frame using the bounds the page last reported.
//!
//! Label ids are only ever looked up, never created, from host strings:
//! an id the session never issued is treated like a removed label.

mod blit;
mod console;

use serde_json::json;
use sk_core::{EditorConfig, ElementId, Point, Rect, ReferenceFrame, SketchError, Tool};
use sk_editor::AnnotationController;
use sk_editor::LoadTicket;
use sk_editor::generate::{self, GenerationRequest};
use sk_editor::input::InputEvent;
use sk_render::BackgroundImage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The page-facing drawing session.
#[wasm_bindgen]
pub struct SketchCanvas {
    controller: AnnotationController,
}

#[wasm_bindgen]
impl SketchCanvas {
    /// Create a session with a `width × height` surface and default
    /// settings.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<SketchCanvas, JsValue> {
        console::install();
        let controller = AnnotationController::with_defaults(width, height).map_err(to_js)?;
        Ok(Self { controller })
    }

    /// Like the constructor, with a JSON `EditorConfig`. Unknown or
    /// malformed JSON falls back to the defaults.
    pub fn with_config(
        width: u32,
        height: u32,
        config_json: &str,
    ) -> Result<SketchCanvas, JsValue> {
        console::install();
        let config = parse_config(config_json);
        let controller = AnnotationController::new(width, height, config).map_err(to_js)?;
        Ok(Self { controller })
    }

    pub fn width(&self) -> u32 {
        self.controller.surface().width()
    }

    pub fn height(&self) -> u32 {
        self.controller.surface().height()
    }

    /// Client rect of the `<canvas>` element.
    pub fn set_surface_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.controller
            .set_bounds(ReferenceFrame::Surface, Some(client_rect(x, y, width, height)));
    }

    /// Client rect of the element holding the text labels.
    pub fn set_container_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.controller
            .set_bounds(ReferenceFrame::Container, Some(client_rect(x, y, width, height)));
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Set the active tool by name (`draw`, `erase`, `text`). Unknown names
    /// select `draw`.
    pub fn set_tool(&mut self, name: &str) {
        self.controller.set_tool(Tool::from_name(name));
    }

    pub fn get_tool_name(&self) -> String {
        self.controller.tool().name().to_string()
    }

    // ─── Surface pointer events ──────────────────────────────────────────
    // Each returns true when the canvas should be repainted.

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.controller
            .handle_surface_event(&InputEvent::from_pointer_down(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller
            .handle_surface_event(&InputEvent::from_pointer_move(x, y))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.controller
            .handle_surface_event(&InputEvent::from_pointer_up(x, y))
    }

    /// The pointer left the canvas; ends a stroke like `pointer_up`.
    pub fn pointer_leave(&mut self) -> bool {
        self.controller.handle_surface_event(&InputEvent::PointerLeave)
    }

    // ─── Text labels ─────────────────────────────────────────────────────

    /// Click on the container background. Returns the id of the new label,
    /// or an empty string when the text tool is not active.
    pub fn container_click(&mut self, x: f64, y: f64) -> String {
        self.controller
            .container_click(Point::new(x, y))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Pointer down on a label. `origin_x`/`origin_y` is the label's client
    /// top-left corner.
    pub fn text_pointer_down(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        origin_x: f64,
        origin_y: f64,
    ) -> bool {
        let Some(id) = ElementId::lookup(id) else {
            return false;
        };
        self.controller
            .text_pointer_down(id, Point::new(x, y), Point::new(origin_x, origin_y))
    }

    pub fn container_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.controller.container_pointer_move(Point::new(x, y))
    }

    pub fn container_pointer_up(&mut self) -> bool {
        self.controller.container_pointer_up()
    }

    pub fn text_double_click(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.controller.text_double_click(id))
    }

    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.controller.set_text(id, text))
    }

    /// The label lost focus. Blank labels are removed.
    pub fn finish_editing(&mut self, id: &str) -> bool {
        ElementId::lookup(id).is_some_and(|id| self.controller.finish_editing(id))
    }

    /// All labels as a JSON array of `{id, text, x, y, isEditing, isDragging}`.
    pub fn text_elements_json(&self) -> String {
        serde_json::to_string(self.controller.text_elements())
            .unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "tool":"<tool_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, meta: bool) -> String {
        let (action, changed) = match self.controller.handle_key(key, ctrl, shift, meta) {
            Some((action, changed)) => (action.name(), changed),
            None => ("none", false),
        };
        let tool = self.controller.tool().name();
        format!(r#"{{"changed":{changed},"action":"{action}","tool":"{tool}"}}"#)
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.controller.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.controller.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.controller.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.controller.can_redo()
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Decode an uploaded image and make it the background.
    pub fn load_background(&mut self, bytes: &[u8]) -> Result<bool, JsValue> {
        self.controller.load_background_bytes(bytes).map_err(to_js)
    }

    /// Same as `load_background` for a `data:` URL.
    pub fn load_background_data_url(&mut self, url: &str) -> Result<bool, JsValue> {
        self.controller.load_background_data_url(url).map_err(to_js)
    }

    /// Start a load whose bytes arrive later (file reader, fetch). Pass the
    /// returned ticket to `finish_background_load`.
    pub fn begin_background_load(&mut self) -> f64 {
        self.controller.begin_background_load().id() as f64
    }

    /// Returns `false` when a newer load or a removal superseded `ticket`.
    pub fn finish_background_load(&mut self, ticket: f64, bytes: &[u8]) -> Result<bool, JsValue> {
        let ticket = LoadTicket::from_id(ticket as u64);
        self.controller
            .finish_background_load(ticket, BackgroundImage::decode(bytes))
            .map_err(to_js)
    }

    pub fn remove_background(&mut self) -> bool {
        self.controller.remove_background()
    }

    pub fn has_background(&self) -> bool {
        self.controller.has_background()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The surface as a `data:image/png;base64,…` URL.
    pub fn export_data_url(&self) -> Result<String, JsValue> {
        self.controller.surface().export_data_url().map_err(to_js)
    }

    /// Paint the surface onto a Canvas2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        blit::blit_surface(ctx, self.controller.surface())
    }

    /// Everything the page needs to call the generation service for the
    /// current sketch. Returns JSON
    /// `{"ok":true,"endpoint":"…","authorization":"…","body":{…}}` or
    /// `{"ok":false,"error":"…"}`.
    pub fn generation_request_json(&self, material: Option<String>, api_key: &str) -> String {
        request_json(self.controller.generation_request(material, api_key))
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Turn the generation service's HTTP status and body into an image URL.
#[wasm_bindgen]
pub fn parse_generation_response(status: u16, body: &str) -> Result<String, JsValue> {
    generate::parse_generation_response(status, body).map_err(to_js)
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn to_js(e: SketchError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn client_rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

fn parse_config(json: &str) -> EditorConfig {
    match serde_json::from_str(json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("invalid editor config, using defaults: {e}");
            EditorConfig::default()
        }
    }
}

fn request_json(request: Result<GenerationRequest, SketchError>) -> String {
    let value = match request {
        Ok(req) => json!({
            "ok": true,
            "endpoint": generate::ENDPOINT,
            "authorization": req.authorization(),
            "body": req.to_body(),
        }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };
    value.to_string()
}
