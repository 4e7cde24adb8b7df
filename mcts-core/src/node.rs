//! `SearchNode`: a transient, per-iteration view over a shared `TreeNode`.
//!
//! Built fresh every iteration and never persisted — this is what lets the
//! same `TreeNode` (a transposition) appear twice in a single selection
//! path with two different parents and depths without the tree itself
//! needing a parent pointer. Merging `SearchNode` into `TreeNode` would
//! either break transposition sharing or corrupt backpropagation; see
//! spec.md §9.

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use rand::Rng;

use mcts_games::GameState;

use crate::tree::{SearchTree, TreeNode};

pub struct SearchNode<G: GameState> {
    pub move_made: Option<G::Move>,
    pub parent: Option<Rc<SearchNode<G>>>,
    tree_node: Arc<Mutex<TreeNode<G>>>,
    pub depth: usize,
}

impl<G: GameState> SearchNode<G> {
    pub fn root(tree_node: Arc<Mutex<TreeNode<G>>>) -> Rc<Self> {
        Rc::new(Self {
            move_made: None,
            parent: None,
            tree_node,
            depth: 0,
        })
    }

    pub fn tree_node(&self) -> &Arc<Mutex<TreeNode<G>>> {
        &self.tree_node
    }

    pub fn player_just_moved(&self) -> u8 {
        self.tree_node.lock().unwrap().player_just_moved()
    }

    pub fn state(&self) -> G {
        self.tree_node.lock().unwrap().state().clone()
    }

    pub fn untried_moves(&self) -> Vec<G::Move> {
        self.tree_node.lock().unwrap().untried_moves().to_vec()
    }

    pub fn has_children(&self) -> bool {
        !self.tree_node.lock().unwrap().children().is_empty()
    }

    /// Select the child maximizing UCB1. The read of wins/visits here is
    /// intentionally lock-scoped only to the snapshot, not the whole
    /// descent: per spec.md §4.6 the Python original's read is unlocked
    /// entirely (benign races on wins/visits can only mislead selection,
    /// never corrupt the tree). Rust needs at least a snapshot lock for
    /// memory safety; we keep it as short as the Python original's
    /// carelessness allows.
    pub fn uct_select_child(self: &Rc<Self>, constant: f64) -> Rc<SearchNode<G>> {
        let parent_visits = self.tree_node.lock().unwrap().visits();

        let snapshot: Vec<(G::Move, Arc<Mutex<TreeNode<G>>>)> = {
            let guard = self.tree_node.lock().unwrap();
            guard
                .children()
                .iter()
                .map(|(mv, node)| (*mv, Arc::clone(node)))
                .collect()
        };
        assert!(
            !snapshot.is_empty(),
            "uct_select_child called on a node with no children"
        );

        let (mv, child) = snapshot
            .into_iter()
            .max_by(|(_, a), (_, b)| {
                ucb1(a, parent_visits, constant)
                    .partial_cmp(&ucb1(b, parent_visits, constant))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .expect("non-empty snapshot");

        Rc::new(SearchNode {
            move_made: Some(mv),
            parent: Some(Rc::clone(self)),
            tree_node: child,
            depth: self.depth + 1,
        })
    }

    /// If this node has an untried move, pick one uniformly at random,
    /// advance a clone of the state by it, look up (or insert) the
    /// resulting `TreeNode`, and return the new child alongside the
    /// advanced state (the starting point for rollout). Returns `None` if
    /// there is nothing left to expand (state is fully expanded or
    /// terminal).
    ///
    /// The choose-and-remove step and the add-child step are each their
    /// own critical section on the `TreeNode`'s lock, per spec.md §4.6:
    /// choosing + removing the move happens atomically against concurrent
    /// expanders, but `add_child` is a separate acquisition — node locks
    /// never nest.
    pub fn try_expand(
        self: &Rc<Self>,
        tree: &SearchTree<G>,
        rng: &mut impl Rng,
    ) -> Option<(Rc<SearchNode<G>>, G)> {
        let mv = {
            let mut guard = self.tree_node.lock().unwrap();
            guard.take_untried_move(rng)
        }?;

        let mut state = self.state();
        state.do_move(mv);
        let child_tree_node = tree.get_node(&state);

        {
            let mut guard = self.tree_node.lock().unwrap();
            guard.add_child(mv, Arc::clone(&child_tree_node));
        }

        let child = Rc::new(SearchNode {
            move_made: Some(mv),
            parent: Some(Rc::clone(self)),
            tree_node: child_tree_node,
            depth: self.depth + 1,
        });
        Some((child, state))
    }

    pub fn update(&self, result: f64) {
        self.tree_node.lock().unwrap().update(result);
    }
}

fn ucb1<G: GameState>(node: &Arc<Mutex<TreeNode<G>>>, parent_visits: f64, constant: f64) -> f64 {
    let guard = node.lock().unwrap();
    guard.value() + constant * (2.0 * parent_visits.ln() / guard.visits()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcts_games::NimState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn try_expand_removes_move_from_untried_and_adds_child() {
        let tree: SearchTree<NimState> = SearchTree::new();
        let root_state = NimState::new(3);
        let root_tree_node = tree.get_node(&root_state);
        let root = SearchNode::root(root_tree_node);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let before = root.untried_moves().len();
        let (child, rollout_state) = root.try_expand(&tree, &mut rng).unwrap();
        assert_eq!(root.untried_moves().len(), before - 1);
        assert!(root.has_children());
        assert_eq!(child.depth, 1);
        assert_eq!(rollout_state.chips(), root_state.chips() - child.move_made.unwrap());
    }

    #[test]
    fn select_child_prefers_higher_value_at_equal_visits() {
        let tree: SearchTree<NimState> = SearchTree::new();
        let root_state = NimState::new(3);
        let root_tree_node = tree.get_node(&root_state);
        let root = SearchNode::root(Arc::clone(&root_tree_node));

        let mut a_state = root_state.clone();
        a_state.do_move(1);
        let a = tree.get_node(&a_state);
        a.lock().unwrap().update(0.9);

        let mut b_state = root_state.clone();
        b_state.do_move(2);
        let b = tree.get_node(&b_state);
        b.lock().unwrap().update(0.1);

        root_tree_node.lock().unwrap().add_child(1, Arc::clone(&a));
        root_tree_node.lock().unwrap().add_child(2, Arc::clone(&b));

        let selected = root.uct_select_child(0.0);
        assert_eq!(selected.move_made, Some(1));
    }
}
