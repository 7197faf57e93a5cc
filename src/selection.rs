/// A sequence with one wrap-around cursor.
///
/// The selected marker is derived from the index, so there is never more
/// than one marked element and moving the cursor implicitly unmarks the
/// previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    items: Vec<T>,
    index: Option<usize>,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: None,
        }
    }
}

impl<T> Selection<T> {
    /// Build from scratch, selecting the first item when there is one.
    pub fn new(items: Vec<T>) -> Self {
        let index = if items.is_empty() { None } else { Some(0) };
        Self { items, index }
    }

    /// Replace the whole sequence, as after a page change.
    pub fn replace(&mut self, items: Vec<T>) {
        *self = Self::new(items);
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index = None;
    }

    /// Select `index`, wrapping below zero to the last item and past the end
    /// to the first one. Does nothing on an empty sequence.
    pub fn select(&mut self, index: isize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let index = if index < 0 {
            len - 1
        } else if index as usize >= len {
            0
        } else {
            index as usize
        };
        self.index = Some(index);
    }

    pub fn next(&mut self) {
        match self.index {
            Some(i) => self.select(i as isize + 1),
            None => self.select(0),
        }
    }

    pub fn previous(&mut self) {
        match self.index {
            Some(i) => self.select(i as isize - 1),
            None => self.select(-1),
        }
    }

    /// Drop items failing `keep` and pull the index back into range.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
        self.reclamp();
    }

    fn reclamp(&mut self) {
        let len = self.items.len();
        self.index = match self.index {
            _ if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&T> {
        self.index.and_then(|i| self.items.get(i))
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.index == Some(index)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
