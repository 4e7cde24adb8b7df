/// Errors the parallel drivers can report.
///
/// A broken `GameState` contract (illegal move, `get_result` on a
/// non-terminal state) is not represented here: it is a fatal programming
/// error in the game implementation and surfaces as a panic, the same way
/// `original_source/common.py` lets a bare `assert` blow up. The one
/// recoverable-as-a-value failure mode is a worker thread dying mid-search;
/// per spec the whole search fails rather than silently reporting a result
/// from fewer workers than requested.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("a search worker panicked before reporting a result")]
    WorkerPanicked,
}
