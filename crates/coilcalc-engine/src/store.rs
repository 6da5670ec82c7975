//! Result Store: current node outputs plus a bounded history ring.
//!
//! The store is the only mutable state the engine touches while evaluating
//! a graph. It tracks, per node, whether the last computed output is still
//! valid (`Fresh`) or has been invalidated (`Stale`), and keeps a FIFO ring
//! of up to `capacity` prior complete snapshots, added only on an explicit
//! `commit`.

use std::collections::{HashMap, HashSet, VecDeque};

use coilcalc_traits::output::NodeOutput;

use crate::error::{EngineError, EngineResult};

/// A complete `{name -> NodeOutput}` mapping, as retained in history.
pub type Snapshot = HashMap<String, NodeOutput>;

/// Holds the current outputs of every installed node and a bounded
/// history of prior complete snapshots.
#[derive(Debug)]
pub struct ResultStore {
    current: Snapshot,
    stale: HashSet<String>,
    history: VecDeque<Snapshot>,
    capacity: usize,
}

impl ResultStore {
    /// Creates an empty store retaining up to `capacity` prior snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            current: HashMap::new(),
            stale: HashSet::new(),
            history: VecDeque::new(),
            capacity,
        }
    }

    /// A read-only view of the current `{name -> NodeOutput}` mapping.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Records a freshly computed output for `name`, clearing its stale
    /// flag.
    pub fn put(&mut self, name: &str, output: NodeOutput) {
        self.current.insert(name.to_string(), output);
        self.stale.remove(name);
    }

    /// Marks every name in `names` as stale. Idempotent: re-invalidating
    /// an already-stale node has no further effect.
    pub fn invalidate<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.stale.insert(name.to_string());
        }
    }

    /// Whether `name` currently holds a stale (or never-computed) output.
    pub fn is_stale(&self, name: &str) -> bool {
        self.stale.contains(name)
    }

    /// Registers a newly installed node as stale, with no prior output.
    pub fn register(&mut self, name: &str) {
        self.stale.insert(name.to_string());
    }

    /// Removes a node's output and staleness tracking entirely. Does not
    /// touch retained history snapshots.
    pub fn unregister(&mut self, name: &str) {
        self.current.remove(name);
        self.stale.remove(name);
    }

    /// Copies the current mapping into history as a new snapshot,
    /// evicting the oldest snapshot first if the ring is at capacity.
    /// Fails with [`EngineError::NotReady`] if any node is currently
    /// stale.
    pub fn commit(&mut self) -> EngineResult<()> {
        if let Some(name) = self.stale.iter().next() {
            return Err(EngineError::NotReady(format!(
                "node '{name}' is stale; run calculations before committing"
            )));
        }
        if self.capacity == 0 {
            return Ok(());
        }
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(self.current.clone());
        Ok(())
    }

    /// The number of snapshots currently retained in history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Returns the snapshot at logical position `index` (0 = oldest
    /// retained). Fails with [`EngineError::OutOfRange`] if `index` is
    /// not currently retained.
    pub fn history(&self, index: usize) -> EngineResult<&Snapshot> {
        self.history.get(index).ok_or(EngineError::OutOfRange {
            index,
            available: self.history.len(),
        })
    }

    /// Drops all current outputs (stale-tracking and history are
    /// untouched by this operation's contract at the store layer; the
    /// engine is responsible for re-marking nodes stale after a clear).
    pub fn clear(&mut self) {
        self.current.clear();
    }
}
