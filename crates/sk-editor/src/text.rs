//! Text overlay store: the ordered set of text labels above the raster.
//!
//! Insertion order is z-order (last element on top). At most one element
//! is in edit mode and at most one is being dragged at any time.
//!
//! Every operation addressed to an id that is no longer present is a
//! silent no-op: DOM events may still arrive for a label that was just
//! removed. The store never talks to history itself; operations that end a
//! user action tell the caller so it can request a snapshot.

use sk_core::{ElementId, Point, TextElement, Vec2};

/// Outcome of committing a text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommit {
    /// The label had content and left edit mode.
    Kept,
    /// The label was blank and has been deleted.
    Removed,
}

#[derive(Debug, Clone, Default)]
pub struct TextStore {
    elements: Vec<TextElement>,
}

impl TextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[TextElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&TextElement> {
        self.elements.iter().find(|t| t.id == id)
    }

    /// The element in edit mode, if any.
    pub fn editing(&self) -> Option<&TextElement> {
        self.elements.iter().find(|t| t.is_editing)
    }

    /// The element being dragged, if any.
    pub fn dragging(&self) -> Option<&TextElement> {
        self.elements.iter().find(|t| t.is_dragging)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut TextElement> {
        self.elements.iter_mut().find(|t| t.id == id)
    }

    // ─── Editing ─────────────────────────────────────────────────────────

    /// Place a new, empty label in edit mode at `at` (container frame).
    /// Any other label leaves edit mode.
    pub fn add_at(&mut self, at: Point) -> ElementId {
        for t in &mut self.elements {
            t.is_editing = false;
        }
        let id = ElementId::fresh_text();
        self.elements.push(TextElement::new(id, at));
        id
    }

    /// Replace the label's content. Returns whether the id was found.
    pub fn set_text(&mut self, id: ElementId, text: &str) -> bool {
        match self.get_mut(id) {
            Some(t) => {
                t.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Leave edit mode; a label whose trimmed text is empty is deleted.
    /// `None` for an unknown id, otherwise the caller should snapshot.
    pub fn finish_editing(&mut self, id: ElementId) -> Option<TextCommit> {
        let pos = self.elements.iter().position(|t| t.id == id)?;
        if self.elements[pos].is_blank() {
            self.elements.remove(pos);
            Some(TextCommit::Removed)
        } else {
            self.elements[pos].is_editing = false;
            Some(TextCommit::Kept)
        }
    }

    /// Put `id` in edit mode and every other label out of it.
    pub fn toggle_edit_at(&mut self, id: ElementId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        for t in &mut self.elements {
            t.is_editing = t.id == id;
        }
        true
    }

    // ─── Dragging ────────────────────────────────────────────────────────

    /// Grab a label. `pointer` and `origin` must be in the same frame; the
    /// returned offset keeps the grabbed point under the cursor.
    ///
    /// Labels in edit mode cannot be dragged.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point, origin: Point) -> Option<Vec2> {
        if self.get(id).is_none_or(|t| t.is_editing) {
            return None;
        }
        for t in &mut self.elements {
            t.is_dragging = t.id == id;
        }
        Some(pointer - origin)
    }

    /// Move the dragged label so that the grabbed point sits at `pointer`
    /// (container frame). Returns whether anything moved.
    pub fn continue_drag(&mut self, pointer: Point, offset: Vec2) -> bool {
        let Some(t) = self.elements.iter_mut().find(|t| t.is_dragging) else {
            return false;
        };
        let pos = pointer - offset;
        t.x = pos.x;
        t.y = pos.y;
        true
    }

    /// Drop the dragged label. Returns whether a drag was in progress, in
    /// which case the caller should snapshot.
    pub fn end_drag(&mut self) -> bool {
        match self.elements.iter_mut().find(|t| t.is_dragging) {
            Some(t) => {
                t.is_dragging = false;
                true
            }
            None => false,
        }
    }

    // ─── Bulk ────────────────────────────────────────────────────────────

    /// Replace the whole collection, e.g. when restoring a history state.
    pub fn replace_all(&mut self, elements: &[TextElement]) {
        self.elements = elements.to_vec();
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing_count(store: &TextStore) -> usize {
        store.elements().iter().filter(|t| t.is_editing).count()
    }

    fn dragging_count(store: &TextStore) -> usize {
        store.elements().iter().filter(|t| t.is_dragging).count()
    }

    #[test]
    fn add_at_leaves_only_new_element_editing() {
        let mut s = TextStore::new();
        let a = s.add_at(Point::new(10.0, 10.0));
        let b = s.add_at(Point::new(50.0, 60.0));
        assert_eq!(editing_count(&s), 1);
        assert!(!s.get(a).unwrap().is_editing);
        let nb = s.get(b).unwrap();
        assert!(nb.is_editing);
        assert_eq!(nb.text, "");
        assert_eq!((nb.x, nb.y), (50.0, 60.0));
        // Insertion order is z-order.
        assert_eq!(s.elements().last().unwrap().id, b);
    }

    #[test]
    fn finish_editing_blank_removes() {
        let mut s = TextStore::new();
        let id = s.add_at(Point::ZERO);
        s.set_text(id, "   ");
        assert_eq!(s.finish_editing(id), Some(TextCommit::Removed));
        assert!(s.is_empty());
    }

    #[test]
    fn finish_editing_keeps_content() {
        let mut s = TextStore::new();
        let id = s.add_at(Point::ZERO);
        s.set_text(id, "Raglan sleeve");
        assert_eq!(s.finish_editing(id), Some(TextCommit::Kept));
        let t = s.get(id).unwrap();
        assert!(!t.is_editing);
        assert_eq!(t.text, "Raglan sleeve");
    }

    #[test]
    fn stale_ids_are_ignored() {
        let mut s = TextStore::new();
        let id = s.add_at(Point::ZERO);
        s.set_text(id, "Hem");
        let before = s.elements().to_vec();

        let ghost = ElementId::intern("text_ghost");
        assert!(!s.set_text(ghost, "x"));
        assert_eq!(s.finish_editing(ghost), None);
        assert!(!s.toggle_edit_at(ghost));
        assert_eq!(s.begin_drag(ghost, Point::ZERO, Point::ZERO), None);
        assert_eq!(s.elements(), &before[..]);
    }

    #[test]
    fn toggle_edit_is_exclusive() {
        let mut s = TextStore::new();
        let a = s.add_at(Point::ZERO);
        s.set_text(a, "A");
        s.finish_editing(a);
        let b = s.add_at(Point::new(5.0, 5.0));
        s.set_text(b, "B");
        s.finish_editing(b);

        assert!(s.toggle_edit_at(a));
        assert_eq!(editing_count(&s), 1);
        assert_eq!(s.editing().map(|t| t.id), Some(a));
    }

    #[test]
    fn cannot_drag_while_editing() {
        let mut s = TextStore::new();
        let id = s.add_at(Point::new(10.0, 10.0));
        assert_eq!(s.begin_drag(id, Point::new(12.0, 12.0), Point::new(10.0, 10.0)), None);
        assert_eq!(dragging_count(&s), 0);
    }

    #[test]
    fn drag_keeps_grab_point_under_cursor() {
        let mut s = TextStore::new();
        let id = s.add_at(Point::new(100.0, 100.0));
        s.set_text(id, "Pocket");
        s.finish_editing(id);

        let offset = s
            .begin_drag(id, Point::new(108.0, 104.0), Point::new(100.0, 100.0))
            .unwrap();
        assert_eq!(offset, Vec2::new(8.0, 4.0));
        assert!(s.continue_drag(Point::new(208.0, 154.0), offset));
        let t = s.get(id).unwrap();
        assert_eq!((t.x, t.y), (200.0, 150.0));

        assert!(s.end_drag());
        assert!(!s.end_drag());
        assert!(!s.continue_drag(Point::new(0.0, 0.0), offset));
    }

    #[test]
    fn at_most_one_dragger() {
        let mut s = TextStore::new();
        let a = s.add_at(Point::ZERO);
        s.set_text(a, "A");
        s.finish_editing(a);
        let b = s.add_at(Point::ZERO);
        s.set_text(b, "B");
        s.finish_editing(b);

        s.begin_drag(a, Point::ZERO, Point::ZERO);
        s.begin_drag(b, Point::ZERO, Point::ZERO);
        assert_eq!(dragging_count(&s), 1);
        assert_eq!(s.dragging().map(|t| t.id), Some(b));
    }
}
