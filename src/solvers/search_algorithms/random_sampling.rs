use super::search::{Search, SearchBase, SearchParameters, SearchStatus, SolutionRecord};
use crate::cut_tree::{CutRecorder, CutTree};
use crate::matrix::{Cost, CostMatrix};
use crate::timer::{TimeKeeper, Timer};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Uniform random sampling of tours.
///
/// Each sample is a shuffled permutation of all cities and counts as one
/// expansion. A sample with a finite cost below the incumbent is emitted;
/// every other sample is pruned. Sampling never proves anything, so the search
/// only stops at the time or expansion limit.
pub struct RandomSampling<C, T = Timer, R = CutTree> {
    base: SearchBase<C, T, R>,
    rng: StdRng,
    tour: Vec<usize>,
}

impl<C: Cost> RandomSampling<C> {
    /// Creates a random sampling solver with a wall-clock timer following the time limit.
    pub fn new(matrix: CostMatrix<C>, parameters: SearchParameters) -> Self {
        let timer = parameters.create_timer();
        let cuts = CutTree::new(matrix.len());

        Self::with_collaborators(matrix, parameters, timer, cuts)
    }
}

impl<C, T, R> RandomSampling<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    /// Creates a random sampling solver with the given time oracle and cut recorder.
    ///
    /// The generator is seeded from `parameters.seed` if given and from the
    /// operating system otherwise.
    pub fn with_collaborators(
        matrix: CostMatrix<C>,
        parameters: SearchParameters,
        timer: T,
        cuts: R,
    ) -> Self {
        let rng = match parameters.seed {
            Some(seed) => {
                debug!("Random seed: {seed}.");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let tour = (0..matrix.len()).collect();
        let mut base = SearchBase::new(matrix, parameters, timer, cuts);

        if base.matrix().is_empty() {
            base.notify_finished(true);
        }

        base.stop_timer();

        Self { base, rng, tour }
    }
}

impl<C, T, R> Search for RandomSampling<C, T, R>
where
    C: Cost,
    T: TimeKeeper,
    R: CutRecorder,
{
    type CostType = C;

    fn search_next(&mut self) -> (Option<SolutionRecord<C>>, bool) {
        self.base.start_timer();

        if self.base.is_terminated() {
            self.base.stop_timer();

            return (None, true);
        }

        self.base.notify_frontier_size(1);

        while !self.base.check_limits() {
            self.tour.shuffle(&mut self.rng);
            self.base.notify_expanded();
            let cost = self.base.matrix().score_tour(&self.tour);

            if self.base.is_improving(cost) {
                let record = self.base.record(self.tour.clone(), cost);
                self.base.stop_timer();

                return (Some(record), self.base.is_terminated());
            }

            self.base.prune(&self.tour);
        }

        self.base.stop_timer();

        (None, true)
    }

    fn get_status(&self) -> &SearchStatus<C> {
        self.base.get_status()
    }
}
