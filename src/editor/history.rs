//! Undo/redo over whole-graph snapshots.
//!
//! Callers record the document *before* each mutating gesture. Undo swaps the
//! current document for the last recorded one and keeps the current one for
//! redo. Recording a new snapshot drops the redo branch, unless the gesture is
//! settled as a no-op, which puts the history back the way it was.

use std::collections::VecDeque;

use crate::model::GraphDocument;

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<GraphDocument>,
    redo: Vec<GraphDocument>,
    capacity: usize,
    /// state displaced by the last `record`, restored by `settle`
    pending: Option<Displaced>,
}

#[derive(Debug, Clone)]
struct Displaced {
    redo: Vec<GraphDocument>,
    evicted: Option<GraphDocument>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    /// `capacity` bounds the undo depth; the oldest snapshot is dropped first.
    pub fn new(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            capacity,
            pending: None,
        }
    }

    pub fn record(
        &mut self,
        snapshot: GraphDocument,
    ) {
        if self.capacity == 0 {
            return;
        }
        let redo = std::mem::take(&mut self.redo);
        let evicted = self.push_undo(snapshot);
        self.pending = Some(Displaced {
            redo,
            evicted,
        });
    }

    /// Forget the last recorded snapshot if it equals `current`, i.e. the
    /// gesture that recorded it ended up changing nothing.
    pub fn settle(
        &mut self,
        current: &GraphDocument,
    ) -> bool {
        let Some(displaced) = self.pending.take() else {
            return false;
        };
        if self.undo.back() != Some(current) {
            return false;
        }
        self.undo.pop_back();
        if let Some(evicted) = displaced.evicted {
            self.undo.push_front(evicted);
        }
        self.redo = displaced.redo;
        true
    }

    pub fn undo(
        &mut self,
        current: GraphDocument,
    ) -> Option<GraphDocument> {
        self.pending = None;
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    pub fn redo(
        &mut self,
        current: GraphDocument,
    ) -> Option<GraphDocument> {
        self.pending = None;
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.pending = None;
    }

    /// Push a snapshot, returning the oldest one if capacity forced it out.
    fn push_undo(
        &mut self,
        snapshot: GraphDocument,
    ) -> Option<GraphDocument> {
        if self.capacity == 0 {
            return None;
        }
        self.undo.push_back(snapshot);
        if self.undo.len() > self.capacity { self.undo.pop_front() } else { None }
    }
}
