//! A Monte-Carlo Tree Search (MCTS/UCT) engine for two-player, zero-sum,
//! deterministic, perfect-information games with results normalized to
//! `[0.0, 1.0]`.
//!
//! The engine consumes only the `mcts_games::GameState` contract — it
//! knows nothing about any particular game. Four parallelization
//! strategies ([`sequential`], [`leaf`], [`root`], [`tree_parallel`]) share
//! one data model: a transposition-aware [`SearchTree`] of [`TreeNode`]s,
//! walked each iteration through a transient [`SearchNode`] view.
//!
//! ## Architecture
//! - [`tree`] — `TreeNode`/`SearchTree`, the persistent, shared half.
//! - [`node`] — `SearchNode`, the transient per-iteration view.
//! - [`algorithm`] — rollout and the two backpropagation variants, shared
//!   verbatim across strategies.
//! - [`sequential`], [`leaf`], [`root`], [`tree_parallel`] — the four
//!   drivers.
//! - [`persistence`] — optional save/load of a `SearchTree`.
//! - [`config`] / [`error`] — the ambient stack.

mod algorithm;
pub mod config;
pub mod error;
pub mod leaf;
mod node;
pub mod persistence;
pub mod root;
pub mod sequential;
mod tree;
pub mod tree_parallel;

pub use algorithm::{backpropagate, backpropagate_averaged, rollout};
pub use config::SearchConfig;
pub use error::SearchError;
pub use node::SearchNode;
pub use tree::{SearchTree, TreeNode};
