//! Reference game implementations and the `GameState` contract the search
//! engine in `mcts-core` consumes.
//!
//! This crate is deliberately the "external collaborator" the engine treats
//! as opaque: it knows nothing about UCT, trees, or parallelism. It only
//! has to answer a handful of questions about a position (legal moves,
//! terminal result, canonical key) the way `original_source/common.py`'s
//! `NimState`/`OthelloState`/`GobangState` do.

mod game_state;
mod gobang;
mod nim;
mod othello;

pub use game_state::GameState;
pub use gobang::GobangState;
pub use nim::NimState;
pub use othello::OthelloState;
