use std::fmt;

/// Position of a buffer within its set. Ids are always `0..count`, so an id
/// is also the buffer's display index and changes when an earlier buffer is
/// removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub id: BufferId,
    pub content: String,
}

impl Buffer {
    fn empty(id: BufferId) -> Self {
        Self {
            id,
            content: String::new(),
        }
    }

    /// Length in chars, the unit every selection offset is expressed in.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Ordered collection of buffers. Never empty; ids are contiguous.
///
/// Only `&Buffer` is handed out, so the two invariants can only be broken
/// through the crate-private mutators below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferSet {
    buffers: Vec<Buffer>,
}

impl BufferSet {
    pub fn new() -> Self {
        Self {
            buffers: vec![Buffer::empty(BufferId(0))],
        }
    }

    /// Build a set from contents in display order. An empty list yields the
    /// usual single empty buffer.
    pub fn from_contents<I, S>(contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let buffers: Vec<Buffer> = contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| Buffer {
                id: BufferId(i),
                content: content.into(),
            })
            .collect();

        if buffers.is_empty() {
            Self::new()
        } else {
            Self { buffers }
        }
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id.0)
    }

    pub fn contains(&self, id: BufferId) -> bool {
        id.0 < self.buffers.len()
    }

    pub fn ids(&self) -> Vec<BufferId> {
        self.buffers.iter().map(|b| b.id).collect()
    }

    pub fn contents(&self) -> Vec<&str> {
        self.buffers.iter().map(|b| b.content.as_str()).collect()
    }

    pub fn last_id(&self) -> BufferId {
        BufferId(self.buffers.len() - 1)
    }

    pub(crate) fn push_empty(&mut self) -> BufferId {
        let id = BufferId(self.buffers.len());
        self.buffers.push(Buffer::empty(id));
        id
    }

    /// Remove a buffer and close the id gap. Refuses to remove the last one.
    pub(crate) fn remove(&mut self, id: BufferId) -> bool {
        if self.buffers.len() <= 1 || !self.contains(id) {
            return false;
        }
        self.buffers.remove(id.0);
        self.reindex();
        true
    }

    pub(crate) fn set_content(&mut self, id: BufferId, content: String) -> bool {
        match self.buffers.get_mut(id.0) {
            Some(buffer) => {
                buffer.content = content;
                true
            }
            None => false,
        }
    }

    fn reindex(&mut self) {
        for (i, buffer) in self.buffers.iter_mut().enumerate() {
            buffer.id = BufferId(i);
        }
    }
}

impl Default for BufferSet {
    fn default() -> Self {
        Self::new()
    }
}
