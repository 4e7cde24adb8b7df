//! Optional serialization of a `SearchTree` to disk and reload on startup.
//! Grounded on `original_source/uct-pickling.py`'s `SearchTree` subclass
//! (load-on-construct, swallow-on-failure, dump-on-shutdown, pruning
//! disabled), realized with `serde_json` the way
//! `my_optimizer::population::{save_population, load_population}`
//! round-trips state to disk with `anyhow::Context` for the edge-facing
//! error message.
//!
//! A corrupt or missing file is never an error from the caller's point of
//! view: `load_tree_or_empty` swallows any failure and starts empty,
//! logging at `warn` (spec.md §7, §4.8).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mcts_games::GameState;

use crate::tree::{SearchTree, TreeNode};

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "G: Serialize, M: Serialize + Eq + std::hash::Hash",
    deserialize = "G: serde::de::DeserializeOwned, M: serde::de::DeserializeOwned + Eq + std::hash::Hash"
))]
struct PersistedNode<G, M> {
    state: G,
    wins: f64,
    visits: f64,
    /// Moves mapped to the *key* of the child node, rather than an inline
    /// copy of it — children are resolved against `PersistedTree::nodes`
    /// on load so that transpositions round-trip as shared nodes, not
    /// duplicated subtrees.
    children: HashMap<M, String>,
    untried_moves: Vec<M>,
}

#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "G: Serialize, M: Serialize + Eq + std::hash::Hash",
    deserialize = "G: serde::de::DeserializeOwned, M: serde::de::DeserializeOwned + Eq + std::hash::Hash"
))]
struct PersistedTree<G, M> {
    nodes: HashMap<String, PersistedNode<G, M>>,
}

impl<G: GameState> SearchTree<G>
where
    G: Serialize,
    G::Move: Serialize + std::hash::Hash + Eq,
{
    fn to_persisted(&self) -> PersistedTree<G, G::Move> {
        let pool = self.pool.lock().unwrap();
        let nodes = pool
            .iter()
            .map(|(key, node)| {
                let guard = node.lock().unwrap();
                let children = guard
                    .children()
                    .iter()
                    .map(|(mv, child)| (*mv, child.lock().unwrap().state().state_key()))
                    .collect();
                (
                    key.clone(),
                    PersistedNode {
                        state: guard.state().clone(),
                        wins: guard.wins(),
                        visits: guard.visits(),
                        children,
                        untried_moves: guard.untried_moves().to_vec(),
                    },
                )
            })
            .collect();
        PersistedTree { nodes }
    }
}

impl<G: GameState> SearchTree<G>
where
    G: DeserializeOwned,
    G::Move: DeserializeOwned + std::hash::Hash + Eq,
{
    fn from_persisted(persisted: PersistedTree<G, G::Move>) -> Self {
        let mut shells: FxHashMap<String, Arc<Mutex<TreeNode<G>>>> = FxHashMap::default();
        for (key, node) in &persisted.nodes {
            shells.insert(
                key.clone(),
                Arc::new(Mutex::new(TreeNode::from_parts(
                    node.state.clone(),
                    node.wins,
                    node.visits,
                    node.untried_moves.clone(),
                ))),
            );
        }
        for (key, node) in &persisted.nodes {
            let Some(shell) = shells.get(key) else { continue };
            let mut guard = shell.lock().unwrap();
            for (mv, child_key) in &node.children {
                if let Some(child) = shells.get(child_key) {
                    guard.add_child(*mv, Arc::clone(child));
                }
            }
        }
        SearchTree {
            pool: Mutex::new(shells),
        }
    }
}

/// Save `tree` to `path` as JSON. Fails loudly — the caller is expected
/// to log/propagate a save failure, unlike a load failure.
pub fn save_tree<G>(tree: &SearchTree<G>, path: impl AsRef<Path>) -> anyhow::Result<()>
where
    G: GameState + Serialize,
    G::Move: Serialize + std::hash::Hash + Eq,
{
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &tree.to_persisted())
        .with_context(|| format!("writing search tree to {}", path.display()))?;
    Ok(())
}

fn load_tree<G>(path: impl AsRef<Path>) -> anyhow::Result<SearchTree<G>>
where
    G: GameState + DeserializeOwned,
    G::Move: DeserializeOwned + std::hash::Hash + Eq,
{
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let persisted: PersistedTree<G, G::Move> = serde_json::from_reader(file)
        .with_context(|| format!("parsing search tree from {}", path.display()))?;
    Ok(SearchTree::from_persisted(persisted))
}

/// Load a previously-saved tree from `path`, or start empty if it doesn't
/// exist or fails to parse for any reason. Never returns an error: the
/// persistent variant's whole point is that a corrupt save file is not a
/// fatal condition.
pub fn load_tree_or_empty<G>(path: impl AsRef<Path>) -> SearchTree<G>
where
    G: GameState + DeserializeOwned,
    G::Move: DeserializeOwned + std::hash::Hash + Eq,
{
    let path = path.as_ref();
    if !path.exists() {
        return SearchTree::new();
    }
    match load_tree(path) {
        Ok(tree) => tree,
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "failed to load persisted search tree, starting empty");
            SearchTree::new()
        }
    }
}
