//! Grid filling by chronological backtracking. Domains are made node and arc consistent once up
//! front; after that the search only reads them, choosing variables by MRV/degree and trying
//! values in least-constraining order, and re-validating the whole assignment after every
//! tentative choice.

use std::sync::mpsc::Receiver;

use instant::{Duration, Instant};
use log::{debug, info, trace};

use crate::assignment::Assignment;
use crate::consistency::{enforce_arc_consistency, enforce_node_consistency};
use crate::domains::Domains;
use crate::grid_config::{GridConfig, Variable};
use crate::heuristics::{order_domain_values, select_unassigned_variable};
use crate::word_list::WordList;

/// Knobs for a single fill attempt.
#[derive(Debug, Default)]
pub struct FillOptions<'a> {
    /// Give up with `FillFailure::Timeout` once this instant has passed.
    pub deadline: Option<Instant>,

    /// Give up with `FillFailure::Abort` as soon as a message arrives on this channel.
    pub abort_rx: Option<&'a Receiver<()>>,
}

impl FillOptions<'static> {
    /// Options with a deadline `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> FillOptions<'static> {
        FillOptions { deadline: Some(Instant::now() + timeout), abort_rx: None }
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Tentative assignments tried.
    pub states: u64,
    pub backtracks: u64,

    /// Domain revisions made by the initial arc consistency pass.
    pub revisions: usize,

    pub duration: Duration,
}

/// A struct representing the results of a fill operation.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Ways a fill attempt can end without a solution. The first two mean the puzzle has no
/// solution; the others mean we stopped looking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillFailure {
    #[error("no words fit the {variable}")]
    DomainExhausted { variable: Variable },

    #[error("no combination of words fills the grid")]
    SearchExhausted,

    #[error("no fill found within {0:?}")]
    Timeout(Duration),

    #[error("fill aborted")]
    Abort,
}

impl FillFailure {
    /// Did the search prove there's no solution (as opposed to being cut short)?
    pub fn is_unsolvable(&self) -> bool {
        matches!(self, FillFailure::DomainExhausted { .. } | FillFailure::SearchExhausted)
    }
}

/// State shared by every level of the recursive search. The domains are only ever borrowed
/// immutably here; the assignment is threaded through the recursion separately.
struct Search<'a> {
    grid: &'a GridConfig,
    word_list: &'a WordList,
    domains: &'a Domains,
    options: &'a FillOptions<'a>,
    start: Instant,
    statistics: Statistics,
}

impl Search<'_> {
    fn check_interrupts(&self) -> Result<(), FillFailure> {
        if let Some(deadline) = self.options.deadline {
            if Instant::now() > deadline {
                return Err(FillFailure::Timeout(self.start.elapsed()));
            }
        }
        if let Some(abort_rx) = self.options.abort_rx {
            if abort_rx.try_recv().is_ok() {
                return Err(FillFailure::Abort);
            }
        }
        Ok(())
    }

    /// Extend `assignment` to a complete, consistent one. Returns `Ok(true)` with the solution
    /// left in `assignment`, or `Ok(false)` with `assignment` restored to how it was passed in.
    fn backtrack(&mut self, assignment: &mut Assignment) -> Result<bool, FillFailure> {
        self.check_interrupts()?;

        if assignment.is_complete(self.grid, self.word_list) {
            return Ok(true);
        }

        let Some(id) = select_unassigned_variable(self.grid, self.domains, assignment) else {
            // Every variable is assigned but the assignment isn't complete, which can only mean
            // a word id from outside the vocabulary was passed in.
            return Ok(false);
        };

        let options = order_domain_values(self.grid, self.word_list, self.domains, id, assignment);

        for word_id in options {
            self.statistics.states += 1;
            assignment.assign(id, word_id);

            if assignment.is_consistent(self.grid, self.word_list) {
                trace!(
                    "Trying {} for {} at depth {}",
                    self.word_list[word_id].string,
                    self.grid.variable(id),
                    assignment.len()
                );

                if self.backtrack(assignment)? {
                    return Ok(true);
                }
            }

            assignment.unassign(id);
            self.statistics.backtracks += 1;
        }

        Ok(false)
    }
}

/// Search for a valid fill for the given grid: enforce node consistency, then arc consistency
/// (failing fast if any domain empties), then backtrack.
pub fn find_fill(
    grid: &GridConfig,
    word_list: &WordList,
    options: &FillOptions,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();

    info!(
        "Filling {} variables from {} words",
        grid.variable_count(),
        word_list.len()
    );

    let mut domains = Domains::new(grid, word_list);
    enforce_node_consistency(grid, word_list, &mut domains);

    // A slot with no words of its length can't be filled, crossings or not.
    if let Some(id) = (0..grid.variable_count()).find(|&id| domains.is_empty(id)) {
        let variable = grid.variable(id);
        info!("No solution: the word list has no words for the {}", variable);
        return Err(FillFailure::DomainExhausted { variable });
    }

    let revisions = match enforce_arc_consistency(grid, word_list, &mut domains, None) {
        Ok(success) => success.revisions,
        Err(failure) => {
            let variable = grid.variable(failure.exhausted_variable_id);
            info!("No solution: arc consistency left no options for the {}", variable);
            return Err(FillFailure::DomainExhausted { variable });
        }
    };

    let mut search = Search {
        grid,
        word_list,
        domains: &domains,
        options,
        start,
        statistics: Statistics { revisions, ..Statistics::default() },
    };

    let mut assignment = Assignment::new(grid.variable_count());
    let found = search.backtrack(&mut assignment)?;

    let mut statistics = search.statistics;
    statistics.duration = start.elapsed();
    debug!("{:?}", statistics);

    if found {
        info!("Found a fill in {:?}", statistics.duration);
        Ok(FillSuccess { statistics, assignment })
    } else {
        info!("No solution: search exhausted after {} states", statistics.states);
        Err(FillFailure::SearchExhausted)
    }
}

/// Fill the grid with no deadline, returning the assignment if there is one.
pub fn solve(grid: &GridConfig, word_list: &WordList) -> Option<Assignment> {
    find_fill(grid, word_list, &FillOptions::default())
        .ok()
        .map(|success| success.assignment)
}
