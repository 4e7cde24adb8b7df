use std::fmt::Debug;
use std::hash::Hash;

/// Behavioral contract the search engine requires of any two-player,
/// zero-sum, deterministic, perfect-information game.
///
/// By convention players are numbered 1 and 2. A fresh root state reports
/// `player_just_moved() == 2` so that player 1 always moves first.
///
/// Implementors get a deep, non-aliasing copy for free from `Clone` — there
/// is no separate `clone()` method in this trait the way the Python source
/// had one, since that's exactly what `Clone` already guarantees for an
/// owned, non-reference-counted struct.
pub trait GameState: Clone {
    /// An opaque move identifier. Treated as a hashable, equality-comparable
    /// value by the engine; never interpreted.
    type Move: Copy + Eq + Hash + Debug;

    /// The player who produced this position.
    fn player_just_moved(&self) -> u8;

    /// Apply `mv` in place. Implementations must flip `player_just_moved`
    /// to `3 - player_just_moved`. Panics (via `assert!`) on an illegal
    /// move — there is no recovery from a broken game contract.
    fn do_move(&mut self, mv: Self::Move);

    /// All legal moves from this position. An empty vector means terminal.
    fn get_moves(&self) -> Vec<Self::Move>;

    /// The result of a terminal position from the viewpoint of `player`:
    /// 0.0 for a loss, 1.0 for a win, 0.5 for a draw. Only defined on
    /// terminal states; implementations assert this precondition.
    fn get_result(&self, player: u8) -> f64;

    /// A canonical, collision-free transposition key: two states with the
    /// same key must be game-equivalent for search purposes.
    fn state_key(&self) -> String;

    /// Convenience derived from `get_moves` — a state is terminal iff it
    /// has no legal moves.
    fn is_terminal(&self) -> bool {
        self.get_moves().is_empty()
    }
}
