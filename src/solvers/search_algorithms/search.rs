use super::search_nodes::{ChildResult, TspNode};
use crate::cut_tree::CutRecorder;
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use log::info;

/// Search parameters.
#[derive(Clone, Debug, Default)]
pub struct SearchParameters {
    /// Whether to suppress log output.
    pub quiet: bool,
    /// Time limit in seconds.
    pub time_limit: Option<f64>,
    /// Maximum number of nodes to expand.
    pub expansion_limit: Option<usize>,
    /// Seed of the random number generator.
    pub seed: Option<u64>,
    /// Initial capacity of the frontier.
    pub initial_frontier_capacity: Option<usize>,
}

impl SearchParameters {
    /// Creates a timer following the time limit.
    pub fn create_timer(&self) -> Timer {
        self.time_limit
            .map(Timer::with_time_limit)
            .unwrap_or_default()
    }
}

/// An improving tour together with the state of the search when it was found.
#[derive(Clone, PartialEq, Debug)]
pub struct SolutionRecord<C> {
    /// Cities in visiting order. The cycle closes from the last city to the first.
    pub tour: Vec<usize>,
    /// Cost of the closed cycle.
    pub cost: C,
    /// Elapsed time in seconds.
    pub time: f64,
    /// Number of open nodes when the tour was found.
    pub frontier_size: usize,
    /// Largest number of open nodes seen so far.
    pub max_frontier_size: usize,
    /// Number of nodes expanded so far.
    pub expanded: usize,
    /// Number of nodes pruned so far.
    pub pruned: usize,
    /// Number of complete tours abandoned so far.
    pub leaves_cut: u128,
    /// Abandoned fraction of all tours.
    pub coverage: f64,
}

/// Summary of a search.
#[derive(Clone, PartialEq, Debug)]
pub struct SearchStatus<C> {
    /// Cost of the best tour found.
    pub best_cost: Option<C>,
    /// Best lower bound on the optimal cost.
    pub best_bound: Option<C>,
    /// Whether the best tour is proven optimal.
    pub is_optimal: bool,
    /// Whether the instance is proven to have no tour.
    pub is_infeasible: bool,
    /// Whether the time limit is reached.
    pub is_time_limit_reached: bool,
    /// Whether the expansion limit is reached.
    pub is_expansion_limit_reached: bool,
    /// Number of nodes expanded.
    pub expanded: usize,
    /// Number of nodes pruned.
    pub pruned: usize,
    /// Largest frontier size.
    pub max_frontier_size: usize,
    /// Elapsed time in seconds.
    pub time: f64,
}

impl<C> Default for SearchStatus<C> {
    fn default() -> Self {
        Self {
            best_cost: None,
            best_bound: None,
            is_optimal: false,
            is_infeasible: false,
            is_time_limit_reached: false,
            is_expansion_limit_reached: false,
            expanded: 0,
            pruned: 0,
            max_frontier_size: 0,
            time: 0.0,
        }
    }
}

/// Search trait.
pub trait Search {
    type CostType;

    /// Searches for the next improving tour.
    ///
    /// The second return value indicates whether the search is terminated.
    /// Once terminated, every further call returns `(None, true)`.
    fn search_next(&mut self) -> (Option<SolutionRecord<Self::CostType>>, bool);

    /// Performs search until termination and returns every improving tour in discovery order.
    fn search(&mut self) -> Vec<SolutionRecord<Self::CostType>> {
        let mut records = Vec::new();

        loop {
            let (record, terminated) = self.search_next();
            records.extend(record);

            if terminated {
                return records;
            }
        }
    }

    /// Returns the summary of the search so far.
    fn get_status(&self) -> &SearchStatus<Self::CostType>;
}

/// Expansion result.
#[derive(Clone, PartialEq, Debug)]
pub enum ExpansionResult<C> {
    /// Node is pruned by bound.
    PrunedByBound,
    /// Improving tour found.
    Solution(SolutionRecord<C>),
    /// Complete tour found but pruned since it is not better.
    SolutionPruned,
    /// Node is expanded.
    Expanded,
}

/// Base search structure shared by all solvers.
///
/// - `C` is the cost type.
/// - `T` is the time oracle.
/// - `R` is the sink for abandoned branches.
///
/// It owns the solver's copy of the cost matrix, the incumbent, the counters
/// and the termination flags.
pub struct SearchBase<C, T, R> {
    matrix: CostMatrix<C>,
    parameters: SearchParameters,
    timer: T,
    cuts: R,
    incumbent: Option<C>,
    frontier_size: usize,
    status: SearchStatus<C>,
    is_finished: bool,
}

impl<C, T, R> SearchBase<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a new search base.
    ///
    /// Self-loops of `matrix` are forbidden here, once per solver.
    pub fn new(mut matrix: CostMatrix<C>, parameters: SearchParameters, timer: T, cuts: R) -> Self {
        matrix.forbid_diagonal();

        Self {
            matrix,
            parameters,
            timer,
            cuts,
            incumbent: None,
            frontier_size: 0,
            status: SearchStatus::default(),
            is_finished: false,
        }
    }

    /// Returns the cost matrix with forbidden self-loops.
    pub fn matrix(&self) -> &CostMatrix<C> {
        &self.matrix
    }

    /// Returns the search parameters.
    pub fn parameters(&self) -> &SearchParameters {
        &self.parameters
    }

    /// Returns the cost of the best tour found so far.
    pub fn incumbent(&self) -> Option<C> {
        self.incumbent
    }

    /// Returns whether a tour of the given cost would improve the incumbent.
    pub fn is_improving(&self, cost: C) -> bool {
        cost.is_finite() && self.incumbent.is_none_or(|incumbent| cost < incumbent)
    }

    /// Resumes the timer.
    pub fn start_timer(&mut self) {
        self.timer.start();
    }

    /// Pauses the timer.
    pub fn stop_timer(&mut self) {
        self.timer.stop();
        self.status.time = self.timer.elapsed().as_secs_f64();
    }

    /// Polls the time oracle and the expansion limit.
    ///
    /// Returns `true` if the search must stop.
    pub fn check_limits(&mut self) -> bool {
        if !self.timer.has_time_left() {
            if !self.status.is_time_limit_reached && !self.parameters.quiet {
                info!("Time limit reached.");
            }

            self.status.is_time_limit_reached = true;

            return true;
        }

        if self
            .parameters
            .expansion_limit
            .is_some_and(|limit| self.status.expanded >= limit)
        {
            if !self.status.is_expansion_limit_reached && !self.parameters.quiet {
                info!("Expansion limit reached.");
            }

            self.status.is_expansion_limit_reached = true;

            return true;
        }

        false
    }

    /// Counts an expanded node.
    pub fn notify_expanded(&mut self) {
        self.status.expanded += 1;
    }

    /// Records the current frontier size.
    pub fn notify_frontier_size(&mut self, size: usize) {
        self.frontier_size = size;
        self.status.max_frontier_size = self.status.max_frontier_size.max(size);
    }

    /// Counts a pruned node and reports its path as abandoned.
    pub fn prune(&mut self, path: &[usize]) {
        self.status.pruned += 1;
        self.cuts.report_cut(path);
    }

    /// Makes `tour` the incumbent and returns its record.
    ///
    /// The caller must have checked [`Self::is_improving`].
    pub fn record(&mut self, tour: Vec<usize>, cost: C) -> SolutionRecord<C> {
        self.incumbent = Some(cost);
        self.status.best_cost = Some(cost);
        self.status.time = self.timer.elapsed().as_secs_f64();

        if !self.parameters.quiet {
            info!(
                "New best tour: {cost}, expanded: {expanded}, pruned: {pruned}, elapsed time: {time}s.",
                expanded = self.status.expanded,
                pruned = self.status.pruned,
                time = self.status.time
            );
        }

        if self.status.best_bound.is_some_and(|bound| cost <= bound) {
            self.notify_optimal();
        }

        SolutionRecord {
            tour,
            cost,
            time: self.status.time,
            frontier_size: self.frontier_size,
            max_frontier_size: self.status.max_frontier_size,
            expanded: self.status.expanded,
            pruned: self.status.pruned,
            leaves_cut: self.cuts.leaves_cut(),
            coverage: self.cuts.coverage_fraction(),
        }
    }

    /// Sets a lower bound on the optimal cost.
    ///
    /// The search finishes if the incumbent already reaches it.
    pub fn update_dual_bound(&mut self, bound: C) {
        if self.status.best_bound.is_some_and(|best| best >= bound) {
            return;
        }

        self.status.best_bound = Some(bound);

        if !self.parameters.quiet {
            info!("New dual bound: {bound}.");
        }

        if self.incumbent.is_some_and(|incumbent| incumbent <= bound) {
            self.notify_optimal();
        }
    }

    fn notify_optimal(&mut self) {
        self.status.is_optimal = true;
        self.status.best_bound = self.incumbent;
        self.is_finished = true;

        if !self.parameters.quiet {
            info!("Optimal solution found.");
        }
    }

    /// Expands a node popped from the frontier.
    ///
    /// `callback` is called with every generated child.
    pub fn expand(
        &mut self,
        node: &TspNode<C>,
        callback: &mut impl FnMut(TspNode<C>),
    ) -> ExpansionResult<C> {
        if self
            .incumbent
            .is_some_and(|incumbent| node.lower_bound() >= incumbent)
        {
            self.prune(node.path());

            return ExpansionResult::PrunedByBound;
        }

        self.notify_expanded();

        if node.is_complete() {
            let cost = self.matrix.score_tour(node.path());

            if self.is_improving(cost) {
                return ExpansionResult::Solution(self.record(node.path().to_vec(), cost));
            }

            self.prune(node.path());

            return ExpansionResult::SolutionPruned;
        }

        let incumbent = self.incumbent;

        for city in node.children() {
            match node.create_child(city, incumbent) {
                ChildResult::Generated(child) => callback(child),
                ChildResult::Infeasible | ChildResult::PrunedByBound => {
                    let mut path = node.path().to_vec();
                    path.push(city);
                    self.prune(&path);
                }
            }
        }

        ExpansionResult::Expanded
    }

    /// Notifies that the search is finished.
    ///
    /// `exhaustive` tells whether every tour was either visited or safely pruned,
    /// in which case the result is proven optimal or the instance proven infeasible.
    pub fn notify_finished(&mut self, exhaustive: bool) {
        self.is_finished = true;

        if !exhaustive || self.status.is_optimal {
            return;
        }

        if self.incumbent.is_some() {
            self.notify_optimal();
        } else {
            self.status.is_infeasible = true;

            if !self.parameters.quiet {
                info!("Proved infeasible.");
            }
        }
    }

    /// Returns whether the search is terminated.
    pub fn is_terminated(&self) -> bool {
        self.is_finished
            || self.status.is_time_limit_reached
            || self.status.is_expansion_limit_reached
    }

    /// Returns the summary of the search.
    pub fn get_status(&self) -> &SearchStatus<C> {
        &self.status
    }
}
