//! Annotation controller: the composition root of a drawing session.
//!
//! Owns the raster surface, the background image, the text overlay and the
//! history stack, and routes host events to the stroke renderer or the
//! text store depending on the active tool. Neither collaborator keeps a
//! reference to the surface or the text collection between calls.
//!
//! Every discrete user action (a finished stroke, a committed text edit, a
//! dropped label, a new background) ends with exactly one call to
//! `capture_state`, which snapshots pixels and labels together.
//!
//! ## Event dispatch
//!
//! | Tool          | Event                              | Effect                         |
//! |---------------|------------------------------------|--------------------------------|
//! | Draw / Erase  | surface down → move → up/leave     | stroke, then snapshot          |
//! | Text          | click on empty container           | new label in edit mode         |
//! | any           | label down → container move → up   | drag, then snapshot            |
//! | any           | label blur / Enter / Escape        | commit edit, then snapshot     |
//! | any           | label double-click                 | enter edit mode                |

use crate::generate::{GenerationRequest, ImageGenerator};
use crate::history::{Checkpoint, HistoryManager};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::text::TextStore;
use sk_core::{
    EditorConfig, ElementId, HistoryState, Point, Rect, ReferenceFrame, SketchError, TextElement,
    Tool, Vec2, to_local,
};
use sk_render::{BackgroundImage, RasterSurface, StrokeRenderer};
use std::sync::Arc;

/// Identifies one background load. Only the most recently issued ticket
/// may install its image; older ones are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    /// Numeric form, for hosts that hand the ticket across an FFI boundary.
    pub fn id(self) -> u64 {
        self.0
    }

    pub fn from_id(id: u64) -> Self {
        Self(id)
    }
}

pub struct AnnotationController {
    config: EditorConfig,
    surface: RasterSurface,
    background: Option<Arc<BackgroundImage>>,
    renderer: StrokeRenderer,
    text: TextStore,
    history: HistoryManager,
    tool: Tool,
    /// Grab offset of the label being dragged.
    drag_offset: Option<Vec2>,
    surface_bounds: Option<Rect>,
    container_bounds: Option<Rect>,
    /// Bumped by every load start and by background removal.
    load_generation: u64,
}

impl AnnotationController {
    /// Start a session on a fresh `width × height` surface. The pristine
    /// state becomes the first history entry.
    pub fn new(width: u32, height: u32, config: EditorConfig) -> Result<Self, SketchError> {
        let surface = RasterSurface::new(width, height)?;
        let mut ctrl = Self {
            renderer: StrokeRenderer::new(&config),
            history: HistoryManager::new(config.effective_history_depth()),
            config,
            surface,
            background: None,
            text: TextStore::new(),
            tool: Tool::default(),
            drag_offset: None,
            surface_bounds: None,
            container_bounds: None,
            load_generation: 0,
        };
        StrokeRenderer::redraw_base(&mut ctrl.surface, None);
        ctrl.capture_state();
        log::debug!("session started on a {width}x{height} surface");
        Ok(ctrl)
    }

    pub fn with_defaults(width: u32, height: u32) -> Result<Self, SketchError> {
        Self::new(width, height, EditorConfig::default())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn text_elements(&self) -> &[TextElement] {
        self.text.elements()
    }

    pub fn text_store(&self) -> &TextStore {
        &self.text
    }

    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    pub fn is_drawing(&self) -> bool {
        self.renderer.is_drawing()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn current_state(&self) -> Option<&HistoryState> {
        self.history.current().map(|entry| &entry.state)
    }

    // ─── Frames & tools ──────────────────────────────────────────────────

    /// Record the on-screen bounds of the surface or the container;
    /// `None` while the element is detached.
    pub fn set_bounds(&mut self, frame: ReferenceFrame, bounds: Option<Rect>) {
        match frame {
            ReferenceFrame::Surface => self.surface_bounds = bounds,
            ReferenceFrame::Container => self.container_bounds = bounds,
        }
    }

    pub fn bounds(&self, frame: ReferenceFrame) -> Option<Rect> {
        match frame {
            ReferenceFrame::Surface => self.surface_bounds,
            ReferenceFrame::Container => self.container_bounds,
        }
    }

    /// Map a screen position into `frame`.
    pub fn to_frame(&self, frame: ReferenceFrame, client: Point) -> Point {
        to_local(client, self.bounds(frame))
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. A stroke already in progress keeps its own mode.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    // ─── Surface events ──────────────────────────────────────────────────

    /// Handle a pointer event on the raster surface. Returns `true` when
    /// the surface needs repainting.
    pub fn handle_surface_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { x, y } => {
                let Some(mode) = self.tool.stroke_mode() else {
                    return false;
                };
                let p = self.to_frame(ReferenceFrame::Surface, Point::new(x, y));
                self.renderer.begin_stroke(mode, p);
                true
            }
            InputEvent::PointerMove { x, y } => {
                if !self.renderer.is_drawing() {
                    return false;
                }
                let p = self.to_frame(ReferenceFrame::Surface, Point::new(x, y));
                self.renderer.extend_stroke(&mut self.surface, p)
            }
            InputEvent::PointerUp { .. } | InputEvent::PointerLeave => {
                if self.renderer.end_stroke() {
                    self.capture_state();
                    true
                } else {
                    false
                }
            }
        }
    }

    // ─── Text events ─────────────────────────────────────────────────────

    /// A click on empty container area. Places a new label when the text
    /// tool is active.
    pub fn container_click(&mut self, client: Point) -> Option<ElementId> {
        if self.tool != Tool::Text {
            return None;
        }
        let at = self.to_frame(ReferenceFrame::Container, client);
        Some(self.text.add_at(at))
    }

    /// Pointer down on a committed label. `origin` is the label's on-screen
    /// top-left corner, in the same (screen) frame as `client`.
    pub fn text_pointer_down(&mut self, id: ElementId, client: Point, origin: Point) -> bool {
        match self.text.begin_drag(id, client, origin) {
            Some(offset) => {
                self.drag_offset = Some(offset);
                true
            }
            None => false,
        }
    }

    /// Pointer move anywhere over the container. Moves the dragged label.
    pub fn container_pointer_move(&mut self, client: Point) -> bool {
        let Some(offset) = self.drag_offset else {
            return false;
        };
        let p = self.to_frame(ReferenceFrame::Container, client);
        self.text.continue_drag(p, offset)
    }

    /// Pointer up over the container. Drops the dragged label.
    pub fn container_pointer_up(&mut self) -> bool {
        self.drag_offset = None;
        if self.text.end_drag() {
            self.capture_state();
            true
        } else {
            false
        }
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        self.text.set_text(id, text)
    }

    /// Label lost focus, or Enter/Escape was pressed in it.
    pub fn finish_editing(&mut self, id: ElementId) -> bool {
        match self.text.finish_editing(id) {
            Some(commit) => {
                log::debug!("text {id} committed: {commit:?}");
                self.capture_state();
                true
            }
            None => false,
        }
    }

    /// Commit whichever label is in edit mode, if any.
    pub fn commit_active_edit(&mut self) -> bool {
        match self.text.editing().map(|t| t.id) {
            Some(id) => self.finish_editing(id),
            None => false,
        }
    }

    pub fn text_double_click(&mut self, id: ElementId) -> bool {
        self.text.toggle_edit_at(id)
    }

    // ─── History ─────────────────────────────────────────────────────────

    /// Step back one entry. The cursor only moves once the entry's pixels
    /// have been applied; an unreadable snapshot leaves everything as is.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.history.undo_target().cloned() else {
            log::debug!("nothing to undo");
            return false;
        };
        if !self.restore(&entry) {
            return false;
        }
        self.history.undo();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.history.redo_target().cloned() else {
            log::debug!("nothing to redo");
            return false;
        };
        if !self.restore(&entry) {
            return false;
        }
        self.history.redo();
        true
    }

    /// Apply a history entry. A stroke or drag in progress is abandoned
    /// either way.
    fn restore(&mut self, entry: &Checkpoint) -> bool {
        self.renderer.end_stroke();
        self.drag_offset = None;
        self.text.end_drag();
        // Snapshots cover every pixel, background included.
        if let Err(e) = self.surface.restore(&entry.state.raster) {
            log::warn!("could not restore raster snapshot: {e}");
            return false;
        }
        self.background = entry.background.clone();
        self.text.replace_all(&entry.state.text_elements);
        true
    }

    /// Snapshot raster, text and background at the same instant. The only
    /// place history entries are created.
    fn capture_state(&mut self) {
        match self.surface.snapshot() {
            Ok(raster) => {
                self.history
                    .snapshot(raster, self.text.elements(), self.background.clone())
            }
            Err(e) => log::warn!("snapshot skipped: {e}"),
        }
    }

    // ─── Background ──────────────────────────────────────────────────────

    /// Start loading a new background. Any load started earlier becomes
    /// stale.
    pub fn begin_background_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Install a decoded background, repaint the base and snapshot.
    ///
    /// Returns `Ok(false)` without touching anything when `ticket` has been
    /// superseded by a newer load or by removal; decode errors of a
    /// current ticket are returned unchanged.
    pub fn finish_background_load(
        &mut self,
        ticket: LoadTicket,
        decoded: Result<BackgroundImage, SketchError>,
    ) -> Result<bool, SketchError> {
        if ticket.0 != self.load_generation {
            log::debug!(
                "discarding stale background load {} (current {})",
                ticket.0,
                self.load_generation
            );
            return Ok(false);
        }
        let image = decoded?;
        self.renderer.end_stroke();
        self.background = Some(Arc::new(image));
        StrokeRenderer::redraw_base(&mut self.surface, self.background.as_deref());
        self.capture_state();
        Ok(true)
    }

    /// Decode image bytes and install them as the background in one step.
    pub fn load_background_bytes(&mut self, bytes: &[u8]) -> Result<bool, SketchError> {
        let decoded = BackgroundImage::decode(bytes)?;
        let ticket = self.begin_background_load();
        self.finish_background_load(ticket, Ok(decoded))
    }

    /// Same as `load_background_bytes` for a `data:` URL. A non-image media
    /// type is rejected before anything changes.
    pub fn load_background_data_url(&mut self, url: &str) -> Result<bool, SketchError> {
        let decoded = BackgroundImage::from_data_url(url)?;
        let ticket = self.begin_background_load();
        self.finish_background_load(ticket, Ok(decoded))
    }

    /// Drop the background and every label. Recorded as an undoable step.
    pub fn remove_background(&mut self) -> bool {
        self.load_generation += 1;
        self.renderer.end_stroke();
        self.drag_offset = None;
        self.background = None;
        self.text.clear();
        StrokeRenderer::redraw_base(&mut self.surface, None);
        self.capture_state();
        true
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and apply a key press. Returns the action and whether state
    /// changed, or `None` for an unbound key.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        meta: bool,
    ) -> Option<(ShortcutAction, bool)> {
        let editing = self.text.editing().is_some();
        let action = ShortcutMap::resolve(key, ctrl, shift, meta, editing)?;
        Some((action, self.dispatch_action(action)))
    }

    pub fn dispatch_action(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::ToolDraw => {
                self.set_tool(Tool::Draw);
                false
            }
            ShortcutAction::ToolErase => {
                self.set_tool(Tool::Erase);
                false
            }
            ShortcutAction::ToolText => {
                self.set_tool(Tool::Text);
                false
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::CommitText => self.commit_active_edit(),
        }
    }

    // ─── Generation ──────────────────────────────────────────────────────

    /// Export the sketch as it looks now and pair it with the optional
    /// material swatch.
    pub fn generation_request(
        &self,
        material: Option<String>,
        api_key: &str,
    ) -> Result<GenerationRequest, SketchError> {
        let request = GenerationRequest {
            sketch: self.surface.export_data_url()?,
            material,
            api_key: api_key.to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    /// Ask `generator` for a rendering of the current sketch. Annotation
    /// state is left untouched whatever the outcome; feed the resulting
    /// image back through the background loaders.
    pub async fn request_rendering<G: ImageGenerator>(
        &self,
        generator: &G,
        material: Option<String>,
        api_key: &str,
    ) -> Result<String, SketchError> {
        let request = self.generation_request(material, api_key)?;
        generator.generate(&request).await
    }
}
