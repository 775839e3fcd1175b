//! Per-thread stack of open logging contexts
//!
//! A `ContextStack` owns the live thread-level attribute mapping and the
//! frames of every context opened on its thread, innermost last. It is a
//! plain value with no synchronization: each thread (or task, with the
//! `task-local` feature) owns exactly one.

use super::attributes::{AttributeMap, FieldValue};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one opened context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    /// Allocate a fresh id, never handed out before in this process
    pub fn next() -> Self {
        ContextId(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Bookkeeping for one open context
#[derive(Debug)]
struct Frame {
    id: ContextId,
    /// Keys this context introduced, with the value it assigned
    own: AttributeMap,
    /// Thread-level values this context overwrote
    shadowed: AttributeMap,
}

impl Frame {
    fn new(id: ContextId) -> Self {
        Self {
            id,
            own: HashMap::new(),
            shadowed: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ContextStack {
    attributes: AttributeMap,
    frames: Vec<Frame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently effective thread-level attributes
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Number of open contexts
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_open(&self, id: ContextId) -> bool {
        self.position(id).is_some()
    }

    /// Push a new empty frame
    pub fn push(&mut self, id: ContextId) {
        self.frames.push(Frame::new(id));
    }

    /// Assign `key` on behalf of context `id`.
    ///
    /// Returns `false` without touching anything when the context is not open
    /// or already owns `key`.
    pub fn add(&mut self, id: ContextId, key: String, value: FieldValue) -> bool {
        let Some(pos) = self.position(id) else {
            return false;
        };
        let frame = &mut self.frames[pos];
        if frame.own.contains_key(&key) {
            return false;
        }

        if let Some(previous) = self.attributes.get(&key) {
            frame.shadowed.insert(key.clone(), previous.clone());
        }
        frame.own.insert(key.clone(), value.clone());
        self.attributes.insert(key, value);
        true
    }

    /// Close context `id`, force-closing every context opened after it first.
    ///
    /// Returns the number of frames closed; zero if `id` is not open.
    pub fn close(&mut self, id: ContextId) -> usize {
        let Some(pos) = self.position(id) else {
            return 0;
        };

        let mut closed = 0;
        while let Some(frame) = self.frames.pop() {
            let reached = frame.id == id;
            self.unwind(frame);
            closed += 1;
            if reached {
                break;
            }
        }
        debug_assert_eq!(self.frames.len(), pos);

        if self.frames.is_empty() {
            self.attributes.clear();
        }
        closed
    }

    /// Drop every frame and attribute
    pub fn clear(&mut self) {
        self.frames.clear();
        self.attributes.clear();
    }

    fn unwind(&mut self, frame: Frame) {
        for key in frame.own.keys() {
            self.attributes.remove(key);
        }
        for (key, value) in frame.shadowed {
            self.attributes.insert(key, value);
        }
    }

    fn position(&self, id: ContextId) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.id == id)
    }
}
