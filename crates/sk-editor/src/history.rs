//! Bounded snapshot history for undo/redo.
//!
//! Unlike an inverse-command stack, every entry is a complete
//! `Checkpoint` (raster pixels, text labels and the background in effect),
//! and a cursor marks the state currently shown. Undo and redo only move
//! the cursor; the caller restores whatever state they return. Callers
//! that can fail to apply a state look at `undo_target`/`redo_target`
//! first and move the cursor only once the state is applied.
//!
//! The stack is a sliding window: once it holds `max_depth` entries, each
//! new snapshot evicts the oldest one and the cursor stays put.

use sk_core::{HistoryState, RasterSnapshot, TextElement};
use sk_render::BackgroundImage;
use std::collections::VecDeque;
use std::sync::Arc;

/// One history entry. The background is shared, not copied, between
/// entries recorded while it was installed.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub state: HistoryState,
    pub background: Option<Arc<BackgroundImage>>,
}

pub struct HistoryManager {
    stack: VecDeque<Checkpoint>,
    /// Index of the current state; `None` while the stack is empty.
    index: Option<usize>,
    max_depth: usize,
}

impl HistoryManager {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            stack: VecDeque::with_capacity(max_depth + 1),
            index: None,
            max_depth,
        }
    }

    /// Push a new state after the current one, discarding any redo tail.
    pub fn snapshot(
        &mut self,
        raster: RasterSnapshot,
        text_elements: &[TextElement],
        background: Option<Arc<BackgroundImage>>,
    ) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.stack.truncate(keep);
        self.stack.push_back(Checkpoint {
            state: HistoryState {
                raster,
                text_elements: text_elements.to_vec(),
            },
            background,
        });

        if self.stack.len() > self.max_depth {
            self.stack.pop_front();
        } else {
            self.index = Some(keep);
        }
        log::debug!(
            "history: {} entries, at {:?}",
            self.stack.len(),
            self.index
        );
    }

    /// The entry `undo` would step to, without moving the cursor.
    pub fn undo_target(&self) -> Option<&Checkpoint> {
        let i = self.index.filter(|&i| i > 0)?;
        self.stack.get(i - 1)
    }

    /// The entry `redo` would step to, without moving the cursor.
    pub fn redo_target(&self) -> Option<&Checkpoint> {
        let i = self.index?;
        self.stack.get(i + 1)
    }

    /// Step back one state. `None` when already at the oldest state.
    pub fn undo(&mut self) -> Option<&Checkpoint> {
        let i = self.index.filter(|&i| i > 0)?;
        self.index = Some(i - 1);
        self.stack.get(i - 1)
    }

    /// Step forward one state. `None` when already at the newest state.
    pub fn redo(&mut self) -> Option<&Checkpoint> {
        let i = self.index?;
        if i + 1 >= self.stack.len() {
            return None;
        }
        self.index = Some(i + 1);
        self.stack.get(i + 1)
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.stack.len())
    }

    /// The state the cursor points at.
    pub fn current(&self) -> Option<&Checkpoint> {
        self.index.and_then(|i| self.stack.get(i))
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop every entry, e.g. when the surface is recreated.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_core::{ElementId, Point};

    fn raster(tag: u8) -> RasterSnapshot {
        RasterSnapshot::new(1, 1, vec![tag])
    }

    fn tag_of(entry: &Checkpoint) -> u8 {
        entry.state.raster.bytes[0]
    }

    #[test]
    fn starts_empty() {
        let h = HistoryManager::new(20);
        assert!(h.is_empty());
        assert_eq!(h.index(), None);
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn single_entry_cannot_undo() {
        let mut h = HistoryManager::new(20);
        h.snapshot(raster(0), &[], None);
        assert_eq!(h.index(), Some(0));
        assert!(!h.can_undo());
        assert!(h.undo().is_none());
        assert!(h.redo().is_none());
    }

    #[test]
    fn undo_redo_move_cursor() {
        let mut h = HistoryManager::new(20);
        for t in 0..3 {
            h.snapshot(raster(t), &[], None);
        }
        assert_eq!(h.undo().map(tag_of), Some(1));
        assert_eq!(h.undo().map(tag_of), Some(0));
        assert!(h.undo().is_none());
        assert!(h.can_redo());
        assert_eq!(h.redo().map(tag_of), Some(1));
        assert_eq!(h.redo().map(tag_of), Some(2));
        assert!(h.redo().is_none());
    }

    #[test]
    fn new_snapshot_discards_redo_tail() {
        let mut h = HistoryManager::new(20);
        for t in 0..3 {
            h.snapshot(raster(t), &[], None);
        }
        h.undo();
        h.undo();
        h.snapshot(raster(9), &[], None);
        assert_eq!(h.len(), 2);
        assert!(!h.can_redo());
        assert!(h.redo().is_none());
        assert_eq!(h.current().map(tag_of), Some(9));
    }

    #[test]
    fn window_slides_at_capacity() {
        let mut h = HistoryManager::new(3);
        for t in 0..5 {
            h.snapshot(raster(t), &[], None);
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), Some(2));
        assert_eq!(h.current().map(tag_of), Some(4));
        assert_eq!(h.undo().map(tag_of), Some(3));
        assert_eq!(h.undo().map(tag_of), Some(2));
        assert!(h.undo().is_none());
    }

    #[test]
    fn text_elements_are_copied() {
        let mut h = HistoryManager::new(20);
        let mut live = vec![TextElement::new(ElementId::intern("text_copy"), Point::ZERO)];
        h.snapshot(raster(0), &live, None);
        live[0].text = "changed".to_string();
        assert_eq!(h.current().unwrap().state.text_elements[0].text, "");
    }

    #[test]
    fn targets_do_not_move_the_cursor() {
        let mut h = HistoryManager::new(20);
        for t in 0..3 {
            h.snapshot(raster(t), &[], None);
        }
        assert_eq!(h.undo_target().map(tag_of), Some(1));
        assert_eq!(h.redo_target().map(tag_of), None);
        assert_eq!(h.index(), Some(2));

        h.undo();
        h.undo();
        assert_eq!(h.undo_target().map(tag_of), None);
        assert_eq!(h.redo_target().map(tag_of), Some(1));
        assert_eq!(h.index(), Some(0));
    }

    #[test]
    fn background_travels_with_its_entry() {
        let bg = Arc::new(BackgroundImage::from_rgba8(1, 1, vec![9, 9, 9, 255]).unwrap());
        let mut h = HistoryManager::new(20);
        h.snapshot(raster(0), &[], None);
        h.snapshot(raster(1), &[], Some(Arc::clone(&bg)));
        assert!(h.current().unwrap().background.is_some());
        assert!(h.undo().unwrap().background.is_none());
        let redone = h.redo().unwrap();
        assert!(Arc::ptr_eq(redone.background.as_ref().unwrap(), &bg));
    }
}
