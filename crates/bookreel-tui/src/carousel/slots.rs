//! L3 Molecular Layer: Slot pool
//!
//! A fixed number of render slots laid out left to right. Scrolling never
//! re-renders the row: each step moves the oldest slot to the end and writes
//! the next item into it. Empty slots (data shorter than the pool) are kept
//! at the tail so filled slots stay contiguous.

use std::collections::VecDeque;

use super::render::RenderedItem;

/// Stable identity of a slot between rebuilds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

/// Which cover a slot is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverState {
    Primary,
    Fallback,
    /// Both primary and fallback failed; draw a text placeholder
    Failed,
}

/// Item rendered into a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotContent {
    /// Index into the carousel's data sequence
    pub data_index: usize,
    pub item: RenderedItem,
    cover: CoverState,
}

impl SlotContent {
    pub fn new(data_index: usize, item: RenderedItem) -> Self {
        Self {
            data_index,
            item,
            cover: CoverState::Primary,
        }
    }

    pub fn cover_state(&self) -> CoverState {
        self.cover
    }

    /// URL of the cover that should be displayed, if any
    pub fn cover_url(&self) -> Option<&str> {
        match self.cover {
            CoverState::Primary => Some(&self.item.image_url),
            CoverState::Fallback => Some(&self.item.fallback_url),
            CoverState::Failed => None,
        }
    }

    /// Record a load failure of the current cover
    ///
    /// Returns the fallback URL to load next, or `None` once nothing is left.
    pub fn cover_failed(&mut self) -> Option<&str> {
        self.cover = match self.cover {
            CoverState::Primary if self.item.image_url != self.item.fallback_url => {
                CoverState::Fallback
            }
            _ => CoverState::Failed,
        };
        self.cover_url()
    }
}

/// One fixed-width render target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    width: u16,
    content: Option<SlotContent>,
}

impl Slot {
    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn content(&self) -> Option<&SlotContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut SlotContent> {
        self.content.as_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}

/// Ordered pool of recycled render slots
#[derive(Debug, Clone, Default)]
pub struct SlotPool {
    slots: VecDeque<Slot>,
    width: u16,
    next_id: u64,
}

impl SlotPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all slots and create `count` empty ones of `width` columns
    pub fn rebuild(&mut self, count: usize, width: u16) {
        self.slots.clear();
        self.width = width;
        for _ in 0..count {
            let id = SlotId(self.next_id);
            self.next_id += 1;
            self.slots.push_back(Slot {
                id,
                width,
                content: None,
            });
        }
    }

    /// Assign items to slots in order; slots beyond the items stay empty
    ///
    /// Returns how many slots were filled.
    pub fn fill_initial<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = SlotContent>,
    {
        for slot in self.slots.iter_mut() {
            slot.content = None;
        }

        let mut filled = 0;
        for (slot, content) in self.slots.iter_mut().zip(items) {
            slot.content = Some(content);
            filled += 1;
        }
        filled
    }

    /// Move the oldest slot to the end of the filled run and render `next` into it
    pub fn recycle_oldest(&mut self, next: SlotContent) {
        let Some(mut slot) = self.slots.pop_front() else {
            return;
        };
        slot.content = Some(next);

        let filled = self.filled_len();
        if filled == self.slots.len() {
            self.slots.push_back(slot);
        } else {
            self.slots.insert(filled, slot);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Width of every slot in columns
    pub fn slot_width(&self) -> u16 {
        self.width
    }

    /// Number of slots holding an item
    pub fn filled_len(&self) -> usize {
        self.slots.iter().take_while(|s| !s.is_empty()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn get_by_id_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    /// Data index shown by each slot, in order
    pub fn data_indices(&self) -> Vec<Option<usize>> {
        self.slots
            .iter()
            .map(|s| s.content.as_ref().map(|c| c.data_index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(index: usize) -> SlotContent {
        SlotContent::new(
            index,
            RenderedItem {
                image_url: format!("https://covers.example/{}.jpg", index),
                fallback_url: "https://covers.example/stub.png".into(),
                caption: format!("Book {} by ", index),
                link_url: "https://openlibrary.org".into(),
            },
        )
    }

    #[test]
    fn test_rebuild_creates_sized_empty_slots() {
        let mut pool = SlotPool::new();
        pool.rebuild(5, 27);
        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|s| s.is_empty() && s.width() == 27));

        pool.rebuild(5, 27);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.slot_width(), 27);
    }

    #[test]
    fn test_fill_initial_short_data_leaves_tail_empty() {
        let mut pool = SlotPool::new();
        pool.rebuild(5, 10);
        let filled = pool.fill_initial((0..3).map(content));

        assert_eq!(filled, 3);
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.data_indices(), vec![Some(0), Some(1), Some(2), None, None]);
    }

    #[test]
    fn test_recycle_moves_oldest_slot_to_end() {
        let mut pool = SlotPool::new();
        pool.rebuild(5, 10);
        pool.fill_initial((0..5).map(content));
        let first_id = pool.get(0).unwrap().id();
        let second_id = pool.get(1).unwrap().id();

        pool.recycle_oldest(content(0));

        assert_eq!(pool.len(), 5);
        assert_eq!(pool.data_indices(), vec![Some(1), Some(2), Some(3), Some(4), Some(0)]);
        // Slots are moved, not recreated
        assert_eq!(pool.get(4).unwrap().id(), first_id);
        assert_eq!(pool.get(0).unwrap().id(), second_id);
    }

    #[test]
    fn test_recycle_keeps_empty_slots_at_tail() {
        let mut pool = SlotPool::new();
        pool.rebuild(5, 10);
        pool.fill_initial((0..4).map(content));

        pool.recycle_oldest(content(0));
        assert_eq!(pool.data_indices(), vec![Some(1), Some(2), Some(3), Some(0), None]);
        assert_eq!(pool.len(), 5);
    }

    #[test]
    fn test_cover_fallback_sequence() {
        let mut c = content(7);
        assert_eq!(c.cover_url(), Some("https://covers.example/7.jpg"));
        assert_eq!(c.cover_failed(), Some("https://covers.example/stub.png"));
        assert_eq!(c.cover_state(), CoverState::Fallback);
        assert_eq!(c.cover_failed(), None);
        assert_eq!(c.cover_state(), CoverState::Failed);
    }

    #[test]
    fn test_cover_already_fallback_fails_once() {
        let mut c = content(1);
        c.item.image_url = c.item.fallback_url.clone();
        assert_eq!(c.cover_failed(), None);
        assert_eq!(c.cover_state(), CoverState::Failed);
    }
}
