//! Depth-limited alpha-beta search.
//!
//! # Core Algorithm
//!
//! Alpha-beta pruning is minimax with a window `[alpha, beta]` of scores that
//! can still matter. Once a node's value is known to fall outside the window
//! its remaining children are skipped; the move chosen at the root is the
//! same one plain minimax would choose.
//!
//! The search is fail-soft: every node reports a score together with a
//! `[lower, upper]` envelope that is guaranteed to contain its true value.
//! A node whose children were all searched and all exact is itself exact.
//! A node abandoned after a cutoff reopens the bound on the mover's side.
//!
//! # Node handling
//!
//! 1. At the depth limit a mover without placements has lost; otherwise the
//!    position is scored by the evaluator.
//! 2. Otherwise the transposition table is probed under every symmetry of
//!    the position. Exact entries are reused outright; bounds that already
//!    close the window are adopted without expanding.
//! 3. A mover with no legal move has lost.
//! 4. Otherwise children are searched in order. The window is passed by
//!    value, so a sibling never sees bounds tightened in another branch.
//!    Each move is applied before descending and undone afterwards, on every
//!    path out of the child.
//!
//! # Move ordering
//!
//! Child lists generated two plies below the root are the lists the engine
//! will choose from on its next turn. They are collected with their scores
//! and handed to a [`BackgroundMoveOrderer`] once the search returns. The
//! next search joins that worker and, if its root was among the collected
//! positions, searches the root children best-first.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::debug;
use rustc_hash::FxHashMap;
use thiserror::Error;

use super::bounds::{is_decided, loss_for, AlphaBeta, Score};
use super::move_ordering::{BackgroundMoveOrderer, ScoredLists};
use super::node::{Envelope, SearchNode};
use super::transposition_table::{TranspositionTable, DEFAULT_CACHE_SIZE_MB};
use super::{Evaluator, GameMove, GameState, MoveGenerator};

/// Ply whose child lists become the engine's next root lists.
const ORDERING_PLY: u8 = 2;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("no available moves")]
    NoAvailableMoves,
    #[error("depth must be at least 1")]
    DepthTooLow,
    #[error("move could not be applied during search: {0}")]
    MoveApplication(String),
}

/// Statistics collected during search.
struct SearchStats {
    position_count: AtomicUsize,
    leaf_evaluations: AtomicUsize,
    terminal_nodes: AtomicUsize,
    exact_hits: AtomicUsize,
    cache_cutoffs: AtomicUsize,
    cutoffs: AtomicUsize,
    last_score: Option<Score>,
    last_score_exact: bool,
    last_duration: Option<Duration>,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            position_count: AtomicUsize::new(0),
            leaf_evaluations: AtomicUsize::new(0),
            terminal_nodes: AtomicUsize::new(0),
            exact_hits: AtomicUsize::new(0),
            cache_cutoffs: AtomicUsize::new(0),
            cutoffs: AtomicUsize::new(0),
            last_score: None,
            last_score_exact: false,
            last_duration: None,
        }
    }

    fn reset(&mut self) {
        self.position_count.store(0, Ordering::SeqCst);
        self.leaf_evaluations.store(0, Ordering::SeqCst);
        self.terminal_nodes.store(0, Ordering::SeqCst);
        self.exact_hits.store(0, Ordering::SeqCst);
        self.cache_cutoffs.store(0, Ordering::SeqCst);
        self.cutoffs.store(0, Ordering::SeqCst);
        self.last_score = None;
        self.last_score_exact = false;
        self.last_duration = None;
    }

    fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn read(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn record_result(&mut self, score: Score, exact: bool, duration: Duration) {
        self.last_score = Some(score);
        self.last_score_exact = exact;
        self.last_duration = Some(duration);
    }
}

pub struct SearchContext<K, M>
where
    K: Clone + Eq + std::hash::Hash + Send + 'static,
    M: Clone + Send + 'static,
{
    depth: u8,
    stats: SearchStats,
    transposition_table: TranspositionTable<K>,
    best_by_depth: Vec<Option<SearchNode<M>>>,
    move_orderer: BackgroundMoveOrderer<K, M>,
    ordering_enabled: bool,
    collected: ScoredLists<K, M>,
    root_preordered: bool,
}

impl<K, M> SearchContext<K, M>
where
    K: Clone + Eq + std::hash::Hash + Send + 'static,
    M: Clone + Send + 'static,
{
    pub fn new(depth: u8) -> Self {
        Self::with_cache_size(depth, DEFAULT_CACHE_SIZE_MB)
    }

    pub fn with_cache_size(depth: u8, cache_size_mb: usize) -> Self {
        Self::with_table(depth, TranspositionTable::new(cache_size_mb))
    }

    pub fn with_table(depth: u8, transposition_table: TranspositionTable<K>) -> Self {
        Self {
            depth,
            stats: SearchStats::new(),
            transposition_table,
            best_by_depth: Vec::new(),
            move_orderer: BackgroundMoveOrderer::new(),
            ordering_enabled: true,
            collected: FxHashMap::default(),
            root_preordered: false,
        }
    }

    pub fn search_depth(&self) -> u8 {
        self.depth
    }

    pub fn set_search_depth(&mut self, depth: u8) {
        self.depth = depth;
    }

    pub fn set_move_ordering(&mut self, enabled: bool) {
        self.ordering_enabled = enabled;
    }

    pub fn move_ordering_enabled(&self) -> bool {
        self.ordering_enabled
    }

    /// Whether the last search took its root moves from a background ordering.
    pub fn root_was_preordered(&self) -> bool {
        self.root_preordered
    }

    /// Empties the transposition table and the per-depth best slots.
    pub fn reset_cache(&mut self) {
        self.transposition_table.clear();
        self.best_by_depth.clear();
    }

    /// Waits for any background ordering and throws it away.
    pub fn shutdown(&mut self) {
        if self.move_orderer.join().is_some() {
            debug!("discarded pending move ordering on shutdown");
        }
        self.collected.clear();
    }

    pub fn transposition_table(&self) -> &TranspositionTable<K> {
        &self.transposition_table
    }

    /// The child adopted at `depth` on the last search; depth 0 holds the
    /// move chosen at the root.
    pub fn best_at_depth(&self, depth: u8) -> Option<&SearchNode<M>> {
        self.best_by_depth
            .get(depth as usize)
            .and_then(|slot| slot.as_ref())
    }

    pub fn searched_position_count(&self) -> usize {
        SearchStats::read(&self.stats.position_count)
    }

    pub fn leaf_evaluations(&self) -> usize {
        SearchStats::read(&self.stats.leaf_evaluations)
    }

    pub fn terminal_nodes(&self) -> usize {
        SearchStats::read(&self.stats.terminal_nodes)
    }

    pub fn exact_hits(&self) -> usize {
        SearchStats::read(&self.stats.exact_hits)
    }

    pub fn cache_cutoffs(&self) -> usize {
        SearchStats::read(&self.stats.cache_cutoffs)
    }

    pub fn cutoffs(&self) -> usize {
        SearchStats::read(&self.stats.cutoffs)
    }

    pub fn tt_size(&self) -> usize {
        self.transposition_table.size()
    }

    pub fn last_score(&self) -> Option<Score> {
        self.stats.last_score
    }

    /// Whether the last root score is the exact depth-limited value rather
    /// than a bound.
    pub fn last_score_exact(&self) -> bool {
        self.stats.last_score_exact
    }

    pub fn last_search_duration(&self) -> Option<Duration> {
        self.stats.last_duration
    }

    fn begin_search(&mut self) {
        self.stats.reset();
        self.transposition_table.clear();
        self.best_by_depth = vec![None; self.depth as usize + 1];
        self.collected.clear();
        self.root_preordered = false;
    }

    fn record_best(&mut self, depth: u8, node: &SearchNode<M>) {
        if let Some(slot) = self.best_by_depth.get_mut(depth as usize) {
            *slot = Some(node.clone());
        }
    }
}

/// Applies a move, executes a closure with the new state, then undoes the move.
/// Handles turn toggling automatically. The undo runs whether or not the
/// closure succeeded.
fn with_move_applied<S, M, F, R>(game_move: &M, state: &mut S, f: F) -> Result<R, SearchError>
where
    S: GameState,
    M: GameMove<State = S>,
    F: FnOnce(&mut S) -> Result<R, SearchError>,
{
    game_move
        .apply(state)
        .map_err(|err| SearchError::MoveApplication(format!("{:?}", err)))?;
    state.toggle_turn();

    let result = f(state);

    state.toggle_turn();
    game_move
        .undo(state)
        .map_err(|err| SearchError::MoveApplication(format!("{:?}", err)))?;

    result
}

/// A child replaces the running best if it is the first one searched, if it
/// is strictly better for the mover, or if it ties and is exact where the
/// running best is not.
fn should_adopt<M>(best: Option<&SearchNode<M>>, child: &SearchNode<M>, maximizing: bool) -> bool {
    let best = match best {
        Some(best) => best,
        None => return true,
    };
    let (best_score, child_score) = match (best.score(), child.score()) {
        (Some(b), Some(c)) => (b, c),
        (None, _) => return true,
        (_, None) => return false,
    };

    let better = if maximizing {
        child_score > best_score
    } else {
        child_score < best_score
    };

    better || (child_score == best_score && child.is_exact() && !best.is_exact())
}

/// Searches for the best move from `state` to the context's depth.
///
/// # Returns
///
/// - `Ok(best_move)` - The move adopted at the root
/// - `Err(SearchError::DepthTooLow)` - If search depth is < 1
/// - `Err(SearchError::NoAvailableMoves)` - If the side to move has no legal move
///
/// `state` is returned to its original position on success and on error.
#[must_use = "search returns the best move found"]
pub fn alpha_beta_search<S, G, E>(
    context: &mut SearchContext<S::Key, G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
) -> Result<G::Move, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    debug!("alpha-beta search depth: {}", context.search_depth());

    if context.search_depth() < 1 {
        return Err(SearchError::DepthTooLow);
    }

    let start = Instant::now();
    let maximizing = state.is_maximizing_player();

    // Join before anything else touches the context.
    let ordered = context.move_orderer.join();

    if !move_generator.has_moves(state) {
        return Err(SearchError::NoAvailableMoves);
    }

    context.begin_search();

    let root_order = ordered.and_then(|mut ordered| {
        let list = ordered.take(&state.position_key());
        debug!(
            "move ordering snapshot: {} lists, root {}",
            ordered.len() + usize::from(list.is_some()),
            if list.is_some() { "found" } else { "not found" }
        );
        list
    });
    context.root_preordered = root_order.is_some();

    let mut root = SearchNode::root(maximizing);
    search_under(
        context,
        state,
        move_generator,
        evaluator,
        &mut root,
        AlphaBeta::default(),
        root_order,
    )?;

    let best_move = context
        .best_at_depth(0)
        .and_then(|node| node.parent_move.clone())
        .ok_or(SearchError::NoAvailableMoves)?;
    let score = root.score().ok_or(SearchError::NoAvailableMoves)?;

    context
        .stats
        .record_result(score, root.is_exact(), start.elapsed());

    debug!(
        "searched {} positions in {:?}: score {} ({}), tt size {}, {} cutoffs, {} cache cutoffs, {} exact hits",
        context.searched_position_count(),
        start.elapsed(),
        score,
        if root.is_exact() { "exact" } else { "bound" },
        context.tt_size(),
        context.cutoffs(),
        context.cache_cutoffs(),
        context.exact_hits(),
    );

    if context.ordering_enabled {
        let collected = std::mem::take(&mut context.collected);
        debug!("ordering {} candidate lists in background", collected.len());
        context.move_orderer.spawn(collected, maximizing);
    }

    Ok(best_move)
}

fn search_under<S, G, E>(
    context: &mut SearchContext<S::Key, G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    node: &mut SearchNode<G::Move>,
    window: AlphaBeta,
    preordered: Option<Vec<G::Move>>,
) -> Result<(), SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    E: Evaluator<S>,
{
    SearchStats::bump(&context.stats.position_count);
    let maximizing = node.maximizing;

    if node.depth >= context.search_depth() {
        if move_generator.has_moves(state) {
            SearchStats::bump(&context.stats.leaf_evaluations);
            let score = evaluator.evaluate(state);
            assert!(
                !is_decided(score),
                "evaluator returned reserved score {}",
                score
            );
            node.set_exact(score);
        } else {
            SearchStats::bump(&context.stats.terminal_nodes);
            node.set_as_terminal(loss_for(maximizing));
        }
        return Ok(());
    }

    let (entry, found) = context
        .transposition_table
        .probe(&state.symmetric_keys());
    if found {
        if entry.is_exact() {
            SearchStats::bump(&context.stats.exact_hits);
            node.adopt_entry(&entry);
            return Ok(());
        }
        if window.can_prune_entry(&entry, maximizing) {
            SearchStats::bump(&context.stats.cache_cutoffs);
            node.adopt_entry(&entry);
            return Ok(());
        }
    }

    let generated;
    let moves: &[G::Move] = match preordered.as_ref() {
        Some(list) => list.as_slice(),
        None => {
            generated = move_generator.generate_moves(state);
            generated.as_ref()
        }
    };

    if moves.is_empty() {
        SearchStats::bump(&context.stats.terminal_nodes);
        node.set_as_terminal(loss_for(maximizing));
        return Ok(());
    }

    let collect = context.ordering_enabled && node.depth == ORDERING_PLY;
    let mut scored: Vec<(G::Move, Option<Score>)> = Vec::new();

    let child_depth = node.depth + 1;
    let mut window = window;
    let mut envelope = Envelope::start(maximizing);
    let mut best: Option<SearchNode<G::Move>> = None;
    let mut cut_at = None;

    for (index, candidate) in moves.iter().enumerate() {
        let mut child = SearchNode::new(!maximizing, child_depth, Some(candidate.clone()));

        with_move_applied(candidate, state, |state| {
            search_under(
                context,
                state,
                move_generator,
                evaluator,
                &mut child,
                window,
                None,
            )
        })?;

        node.nodes_searched += child.nodes_searched;
        envelope.fold(&child);
        if collect {
            scored.push((candidate.clone(), child.score()));
        }

        if !should_adopt(best.as_ref(), &child, maximizing) {
            continue;
        }

        let score = match child.score() {
            Some(score) => score,
            None => continue,
        };
        window.update_if_needed(score, maximizing);
        context.record_best(node.depth, &child);
        best = Some(child);

        if window.can_prune(score, maximizing) {
            cut_at = Some(index);
            break;
        }
    }

    let best_score = best
        .as_ref()
        .and_then(|best| best.score())
        .ok_or(SearchError::NoAvailableMoves)?;
    node.set_score(best_score);

    match cut_at {
        Some(index) => {
            SearchStats::bump(&context.stats.cutoffs);
            node.set_envelope(envelope.cut_off());
            if collect {
                scored.extend(moves[index + 1..].iter().map(|m| (m.clone(), None)));
            }
        }
        None => node.set_envelope(envelope),
    }

    context.transposition_table.insert(
        state.position_key(),
        node.lower,
        node.upper,
        node.nodes_searched,
    );

    if collect {
        context.collected.insert(state.position_key(), scored);
    }

    Ok(())
}
