/// Tunables threaded explicitly through every engine entry point.
///
/// The Python original kept `ITER_MAX`/`PARALLEL_COUNT` as module globals
/// read by `main()`. Per the spec's design note, defaults here are still
/// just defaults — nothing reads them from ambient state at search time.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Number of simulations to run. Exact; there is no early termination.
    pub iter_max: usize,
    /// UCB1 exploration constant C used during search (0.0 is used for the
    /// final root move selection regardless of this value).
    pub exploration: f64,
    /// Worker count for the parallel variants. Ignored by `sequential`.
    pub workers: usize,
    /// When set, the sequential/leaf/tree-parallel drivers log a summary
    /// (max depth, nodes generated, root child stats) at `info` level.
    pub verbose: bool,
    /// Optional RNG seed for reproducible searches. `None` seeds from
    /// entropy.
    pub seed: Option<u64>,
    /// Whether the driver prunes the tree to the chosen subtree once the
    /// search ends. Root-parallel and persistent callers set this to
    /// `false` (see `SearchTree::compact` for a manual alternative).
    pub prune: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iter_max: 100,
            exploration: 1.0,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            verbose: false,
            seed: None,
            prune: true,
        }
    }
}

impl SearchConfig {
    pub fn with_iter_max(mut self, iter_max: usize) -> Self {
        self.iter_max = iter_max;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn without_pruning(mut self) -> Self {
        self.prune = false;
        self
    }
}
