use alloc::vec::Vec;

/// Positional storage for fetched rows.
///
/// Each accepted page is written at the index implied by its page number. Slots that have not
/// been loaded yet read as `None`, which hosts render as placeholders. The buffer only grows
/// while a data source is attached; [`DataBuffer::clear`] is reserved for re-attachment.
#[derive(Clone, Debug)]
pub struct DataBuffer<T> {
    slots: Vec<Option<T>>,
    loaded: usize,
}

impl<T> Default for DataBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DataBuffer<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            loaded: 0,
        }
    }

    /// Number of slots (loaded or not) up to the furthest written row.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a row.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Length of the gap-free prefix of loaded rows.
    pub fn contiguous_len(&self) -> usize {
        self.slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Iterates all slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.slots.iter().map(Option::as_ref)
    }

    /// Writes `items` starting at `start`. Rewriting a span with the same rows leaves the
    /// buffer's length and loaded count unchanged, and writing no items leaves it untouched.
    ///
    /// Returns the number of slots that went from empty to loaded.
    pub fn write(&mut self, start: usize, items: Vec<T>) -> usize {
        if items.is_empty() {
            return 0;
        }
        let end = start.saturating_add(items.len());
        if self.slots.len() < end {
            self.slots.resize_with(end, || None);
        }

        let mut inserted = 0usize;
        for (slot, item) in self.slots[start..end].iter_mut().zip(items) {
            if slot.is_none() {
                inserted += 1;
            }
            *slot = Some(item);
        }
        self.loaded += inserted;
        inserted
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.loaded = 0;
    }
}
