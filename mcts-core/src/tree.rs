//! The persistent, transposition-shared half of the data model: `TreeNode`
//! (one per distinct game position) and `SearchTree` (the table that owns
//! them). Grounded on `original_source/common.py`'s `TreeNode`/`SearchTree`
//! classes, with `rustc_hash::FxHashMap` standing in for the hot maps the
//! way `hexwar_core`'s board representation uses `FxHashMap` for position
//! lookups.

use std::sync::{Arc, Mutex};

use rand::Rng;
use rustc_hash::FxHashMap;

use mcts_games::GameState;

/// One node per unique state observed during search. Shared across every
/// path that reaches the same position — this is what makes transposition
/// sharing possible; it carries no parent link, since the same `TreeNode`
/// can legitimately sit under more than one parent.
#[derive(Debug)]
pub struct TreeNode<G: GameState> {
    state: G,
    wins: f64,
    visits: f64,
    children: FxHashMap<G::Move, Arc<Mutex<TreeNode<G>>>>,
    untried_moves: Vec<G::Move>,
}

impl<G: GameState> TreeNode<G> {
    fn new(state: G) -> Self {
        let untried_moves = state.get_moves();
        Self {
            state,
            wins: 0.0,
            visits: 1.0,
            children: FxHashMap::default(),
            untried_moves,
        }
    }

    /// Reconstruct a node from its persisted fields, children to be wired
    /// up by the caller afterward (see `persistence::from_persisted`).
    pub(crate) fn from_parts(state: G, wins: f64, visits: f64, untried_moves: Vec<G::Move>) -> Self {
        Self {
            state,
            wins,
            visits,
            children: FxHashMap::default(),
            untried_moves,
        }
    }

    pub fn state(&self) -> &G {
        &self.state
    }

    pub fn wins(&self) -> f64 {
        self.wins
    }

    pub fn visits(&self) -> f64 {
        self.visits
    }

    pub fn untried_moves(&self) -> &[G::Move] {
        &self.untried_moves
    }

    pub fn children(&self) -> &FxHashMap<G::Move, Arc<Mutex<TreeNode<G>>>> {
        &self.children
    }

    /// Mean value from the viewpoint of this node's `player_just_moved`.
    /// Well-defined without a zero-visits special case: a fresh node starts
    /// with `visits = 1.0, wins = 0.0`.
    pub fn value(&self) -> f64 {
        self.wins / self.visits
    }

    pub fn player_just_moved(&self) -> u8 {
        self.state.player_just_moved()
    }

    /// Choose and remove one untried move, atomically with respect to
    /// concurrent expanders holding the same node's lock (tree-parallel
    /// relies on this: two threads racing to expand the same node must
    /// never both walk off with the same move).
    pub(crate) fn take_untried_move(&mut self, rng: &mut impl Rng) -> Option<G::Move> {
        if self.untried_moves.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.untried_moves.len());
        Some(self.untried_moves.swap_remove(idx))
    }

    pub(crate) fn add_child(&mut self, mv: G::Move, child: Arc<Mutex<TreeNode<G>>>) {
        self.children.insert(mv, child);
    }

    pub(crate) fn update(&mut self, result: f64) {
        self.visits += 1.0;
        self.wins += result;
    }
}

/// A transposition table: the unique owner of every `TreeNode` observed
/// during search, keyed by each state's canonical `state_key`.
///
/// All variants share this type. Sequential/leaf-parallel/persistent use
/// it from a single thread (or with rollouts as the only parallel part);
/// tree-parallel shares one instance across threads. The table-wide lock
/// is always present so the data model really is shared across all four
/// strategies, even though only tree-parallel contends on it.
pub struct SearchTree<G: GameState> {
    pub(crate) pool: Mutex<FxHashMap<String, Arc<Mutex<TreeNode<G>>>>>,
}

impl<G: GameState> Default for SearchTree<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GameState> SearchTree<G> {
    pub fn new() -> Self {
        Self {
            pool: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of distinct positions currently held.
    pub fn len(&self) -> usize {
        self.pool.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the node for `state`, inserting a freshly constructed one
    /// if this is the first time this position has been seen.
    pub fn get_node(&self, state: &G) -> Arc<Mutex<TreeNode<G>>> {
        let key = state.state_key();
        let mut pool = self.pool.lock().unwrap();
        pool.entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(TreeNode::new(state.clone()))))
            .clone()
    }

    /// Prune the table to exactly the set reachable from `keep_subtree_root`
    /// by transitive traversal of child links. Safe in the presence of
    /// cycles in the child graph (a repeated position reachable from
    /// itself): the visited set is tracked by node identity, not depth.
    pub fn clean_sub_tree(&self, keep_subtree_root: &Arc<Mutex<TreeNode<G>>>) {
        let mut reachable: std::collections::HashSet<usize> = std::collections::HashSet::new();
        let mut stack = vec![Arc::clone(keep_subtree_root)];
        while let Some(node) = stack.pop() {
            let ptr = Arc::as_ptr(&node) as usize;
            if !reachable.insert(ptr) {
                continue;
            }
            let guard = node.lock().unwrap();
            for child in guard.children.values() {
                stack.push(Arc::clone(child));
            }
        }

        let mut pool = self.pool.lock().unwrap();
        pool.retain(|_, node| reachable.contains(&(Arc::as_ptr(node) as usize)));
    }

    /// Manual compaction for callers (e.g. the persistent variant) that
    /// disable automatic pruning and want to bound memory between games.
    pub fn compact(&self, keep_state: &G) {
        let root = self.get_node(keep_state);
        self.clean_sub_tree(&root);
    }
}
