//! Handing freshly parsed trees to a real-time consumer.
//!
//! The publishing side (an editor, a control thread) sends new trees over a
//! bounded queue. The real-time side picks up the newest one between blocks
//! with [`TreeSubscriber::refresh`], which never blocks nor allocates, and
//! sends the tree it replaced back over a second queue. Dropping a tree can
//! free a whole graph of nodes, so that only ever happens on the publishing
//! side, in [`TreePublisher::reclaim`].

use std::fmt;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};

use crate::formula::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum PublishError {
    /// The consumer has not caught up yet. The tree is handed back.
    Full(Expr),
    /// The consumer is gone. The tree is handed back.
    Disconnected(Expr),
}

impl PublishError {
    pub fn into_inner(self) -> Expr {
        match self {
            PublishError::Full(expr) | PublishError::Disconnected(expr) => expr,
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Full(_) => write!(f, "Tree queue is full"),
            PublishError::Disconnected(_) => write!(f, "Tree subscriber disconnected"),
        }
    }
}

impl std::error::Error for PublishError {}

#[derive(Debug)]
pub struct TreePublisher {
    updates: Sender<Expr>,
    retired: Receiver<Expr>,
}

#[derive(Debug)]
pub struct TreeSubscriber {
    updates: Receiver<Expr>,
    retired: Sender<Expr>,
    current: Option<Expr>,
}

/// Creates a publisher/subscriber pair. `capacity` bounds how many trees may
/// be in flight in each direction.
pub fn channel(capacity: usize) -> (TreePublisher, TreeSubscriber) {
    let capacity = capacity.max(1);
    let (updates_tx, updates_rx) = bounded(capacity);
    // One more slot than the update queue: a single refresh can retire every
    // pending update plus the tree that was current.
    let (retired_tx, retired_rx) = bounded(capacity + 1);
    (
        TreePublisher {
            updates: updates_tx,
            retired: retired_rx,
        },
        TreeSubscriber {
            updates: updates_rx,
            retired: retired_tx,
            current: None,
        },
    )
}

impl TreePublisher {
    /// Queues `expr` for the subscriber. Never blocks.
    pub fn publish(&self, expr: Expr) -> Result<(), PublishError> {
        self.reclaim();
        self.updates.try_send(expr).map_err(|e| match e {
            TrySendError::Full(expr) => PublishError::Full(expr),
            TrySendError::Disconnected(expr) => PublishError::Disconnected(expr),
        })
    }

    /// Drops every tree the subscriber has retired. Returns how many.
    pub fn reclaim(&self) -> usize {
        self.retired.try_iter().count()
    }

    pub fn pending(&self) -> usize {
        self.updates.len()
    }
}

impl TreeSubscriber {
    /// Swaps in the newest published tree, if any. Returns whether the
    /// current tree changed.
    pub fn refresh(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.updates.try_recv() {
                Ok(expr) => {
                    if let Some(old) = self.current.replace(expr) {
                        self.retire(old);
                    }
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn retire(&self, old: Expr) {
        // If the publisher is gone or behind, the tree has to die here.
        let _ = self.retired.try_send(old);
    }

    pub fn current(&self) -> Option<&Expr> {
        self.current.as_ref()
    }
}
