//! Background sorting of candidate lists gathered during a search.
//!
//! A search records the child lists it generated at the positions where the
//! engine will next be asked to move. Once the search returns, those lists
//! are handed to a worker thread that sorts each one best-first and sends
//! back an immutable snapshot. The following search joins the worker before
//! it reads anything, and drops the snapshot once the root has been ordered.

use std::cmp::Ordering;
use std::hash::Hash;
use std::sync::mpsc::{sync_channel, Receiver};
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use super::bounds::Score;

/// Candidate moves per position, each paired with the score the search
/// found for it (`None` if a cutoff left it unexplored).
pub type ScoredLists<K, M> = FxHashMap<K, Vec<(M, Option<Score>)>>;

/// Finished ordering produced by one background pass.
#[derive(Debug)]
pub struct OrderedMoves<K: Eq + Hash, M> {
    lists: FxHashMap<K, Vec<M>>,
}

impl<K: Eq + Hash, M> OrderedMoves<K, M> {
    pub fn get(&self, key: &K) -> Option<&[M]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    pub fn take(&mut self, key: &K) -> Option<Vec<M>> {
        self.lists.remove(key)
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

struct PendingOrdering<K: Eq + Hash, M> {
    receiver: Receiver<OrderedMoves<K, M>>,
    handle: JoinHandle<()>,
}

pub struct BackgroundMoveOrderer<K: Eq + Hash, M> {
    pending: Option<PendingOrdering<K, M>>,
}

impl<K: Eq + Hash, M> Default for BackgroundMoveOrderer<K, M> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<K, M> BackgroundMoveOrderer<K, M>
where
    K: Eq + Hash + Send + 'static,
    M: Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a worker that orders `lists` for the side given by
    /// `maximizing`. Any earlier worker is joined and its result discarded,
    /// so at most one ordering is ever outstanding.
    pub fn spawn(&mut self, lists: ScoredLists<K, M>, maximizing: bool) {
        if self.join().is_some() {
            debug!("discarding unused move ordering");
        }

        if lists.is_empty() {
            return;
        }

        let (sender, receiver) = sync_channel(1);
        let handle = thread::spawn(move || {
            let ordered = order_lists(lists, maximizing);
            // The receiver is gone only if the owner shut down without joining.
            let _ = sender.send(ordered);
        });

        self.pending = Some(PendingOrdering { receiver, handle });
    }

    /// Waits for the outstanding worker, if any, and returns its snapshot.
    pub fn join(&mut self) -> Option<OrderedMoves<K, M>> {
        let pending = self.pending.take()?;
        let ordered = pending.receiver.recv().ok();

        if pending.handle.join().is_err() {
            warn!("move ordering worker panicked");
            return None;
        }

        ordered
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<K: Eq + Hash, M> Drop for BackgroundMoveOrderer<K, M> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            drop(pending.receiver);
            let _ = pending.handle.join();
        }
    }
}

fn order_lists<K, M>(lists: ScoredLists<K, M>, maximizing: bool) -> OrderedMoves<K, M>
where
    K: Eq + Hash + Send,
    M: Send,
{
    let mut entries: Vec<(K, Vec<(M, Option<Score>)>)> = lists.into_iter().collect();

    entries.par_iter_mut().for_each(|(_, moves)| {
        moves.sort_by(|(_, a), (_, b)| best_first(*a, *b, maximizing));
    });

    let lists = entries
        .into_iter()
        .map(|(key, moves)| (key, moves.into_iter().map(|(m, _)| m).collect()))
        .collect();

    OrderedMoves { lists }
}

/// Descending for the maximizer, ascending for the minimizer, unexplored
/// moves last. Stable, so ties keep generation order.
fn best_first(a: Option<Score>, b: Option<Score>, maximizing: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if maximizing => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
