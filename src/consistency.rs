//! Constraint propagation over the domain store: node consistency (word length) and arc
//! consistency (AC-3 over the crossings).

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::domains::Domains;
use crate::grid_config::{GridConfig, VariableId};
use crate::word_list::WordList;

/// An ordered pair of variables `(x, y)`: "make `x` consistent with `y`".
pub type Arc = (VariableId, VariableId);

/// Worklist of arcs still to be revised. An arc that's already waiting isn't queued twice.
#[derive(Debug)]
struct ConsistencyQueue {
    queue: VecDeque<Arc>,
    queued: HashSet<Arc>,
}

impl ConsistencyQueue {
    fn with_initial_queue<Items>(items: Items) -> ConsistencyQueue
    where
        Items: IntoIterator<Item = Arc>,
    {
        let mut queue = ConsistencyQueue { queue: VecDeque::new(), queued: HashSet::new() };
        for arc in items {
            queue.enqueue(arc);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<Arc> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, arc: Arc) {
        if self.queued.insert(arc) {
            self.queue.push_back(arc);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many calls to `revise` actually shrank a domain.
    pub revisions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The variable whose domain was emptied.
    pub exhausted_variable_id: VariableId,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Restrict every variable's domain to words of exactly the variable's length.
pub fn enforce_node_consistency(grid: &GridConfig, word_list: &WordList, domains: &mut Domains) {
    for id in 0..grid.variable_count() {
        let length = grid.variable(id).length;
        domains.retain(id, |word_id| word_list[word_id].len() == length);
    }
}

/// Make `x` arc consistent with `y`: remove every word from `x`'s domain that has no partner in
/// `y`'s domain with the same letter in the shared cell. A word never supports itself, since the
/// same word can't fill both variables. If the two don't cross, nothing is revised.
///
/// Returns whether `x`'s domain changed.
pub fn revise(
    grid: &GridConfig,
    word_list: &WordList,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> bool {
    let Some((x_cell, y_cell)) = grid.overlap(x, y) else {
        return false;
    };

    // How many options for `y` hold each letter in the shared cell?
    let y_glyph_counts = domains.glyph_counts(word_list, y, y_cell);
    let y_domain = domains.get(y).clone();

    let revised = domains.retain(x, |word_id| {
        let glyphs = &word_list[word_id].glyphs;
        let Some(&glyph) = glyphs.get(x_cell) else {
            return false;
        };

        let mut support = y_glyph_counts.get(&glyph).copied().unwrap_or(0);
        if y_domain.contains(word_id) && glyphs.get(y_cell) == Some(&glyph) {
            support -= 1;
        }

        support > 0
    });

    if revised {
        trace!("Revised {} against {}: {} options left", x, y, domains.len(x));
    }

    revised
}

/// Run AC-3 until every arc is consistent or some domain is emptied.
///
/// If `initial_arcs` is `None`, the worklist starts with every pair of crossing variables in both
/// directions. Whenever `x`'s domain shrinks, every other neighbor `z` of `x` gets `(z, x)`
/// requeued, since `z`'s options may have been relying on the words `x` just lost.
pub fn enforce_arc_consistency(
    grid: &GridConfig,
    word_list: &WordList,
    domains: &mut Domains,
    initial_arcs: Option<&[Arc]>,
) -> ArcConsistencyResult {
    let mut queue = match initial_arcs {
        Some(arcs) => ConsistencyQueue::with_initial_queue(arcs.iter().copied()),
        None => ConsistencyQueue::with_initial_queue(
            (0..grid.variable_count())
                .flat_map(|x| grid.neighbors(x).iter().map(move |&y| (x, y))),
        ),
    };

    let mut revisions = 0;

    while let Some((x, y)) = queue.pop_front() {
        if !revise(grid, word_list, domains, x, y) {
            continue;
        }
        revisions += 1;

        if domains.is_empty(x) {
            debug!("Arc consistency emptied the domain of {}", grid.variable(x));
            return Err(ArcConsistencyFailure { exhausted_variable_id: x });
        }

        for &z in grid.neighbors(x) {
            if z != y {
                queue.enqueue((z, x));
            }
        }
    }

    debug!("Arc consistency reached a fixpoint after {} revisions", revisions);

    Ok(ArcConsistencySuccess { revisions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::Direction::{Across, Down};
    use crate::grid_config::Variable;

    /// ___
    /// #_#
    /// #_#
    fn crossing_pair() -> GridConfig {
        GridConfig::from_variables(
            3,
            3,
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 1, Down, 3)],
        )
        .unwrap()
    }

    fn domain_strings(domains: &Domains, word_list: &WordList, id: VariableId) -> Vec<String> {
        domains.iter(id).map(|word_id| word_list[word_id].string.clone()).collect()
    }

    /// Every surviving word of `x` has a distinct partner in `y` agreeing at the crossing.
    fn assert_arc_consistent(grid: &GridConfig, word_list: &WordList, domains: &Domains) {
        for x in 0..grid.variable_count() {
            for &y in grid.neighbors(x) {
                let (x_cell, y_cell) = grid.overlap(x, y).unwrap();
                for a in domains.iter(x) {
                    assert!(
                        domains.iter(y).any(|b| {
                            a != b && word_list[a].glyphs[x_cell] == word_list[b].glyphs[y_cell]
                        }),
                        "{} has no support in {}",
                        word_list[a].string,
                        y
                    );
                }
            }
        }
    }

    #[test]
    fn test_node_consistency_filters_by_length() {
        let grid = crossing_pair();
        let word_list = WordList::new(["cat", "gold", "at", "art"]);
        let mut domains = Domains::new(&grid, &word_list);

        enforce_node_consistency(&grid, &word_list, &mut domains);

        for id in 0..grid.variable_count() {
            assert!(domains.iter(id).all(|word_id| word_list[word_id].len() == 3));
            assert_eq!(domain_strings(&domains, &word_list, id), vec!["ART", "CAT"]);
        }
    }

    #[test]
    fn test_node_consistency_is_idempotent() {
        let grid = GridConfig::from_template_str(
            "
            #___#
            #_##_
            #_##_
            #_##_
            #____
            ",
        )
        .unwrap();
        let word_list = WordList::new(["one", "two", "three", "four", "five", "seven", "nine"]);
        let mut domains = Domains::new(&grid, &word_list);

        enforce_node_consistency(&grid, &word_list, &mut domains);
        let once = domains.clone();
        enforce_node_consistency(&grid, &word_list, &mut domains);

        assert_eq!(domains, once);
    }

    #[test]
    fn test_revise_prunes_unsupported_words() {
        let grid = crossing_pair();
        let word_list = WordList::new(["cat", "car", "art"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        // The across word's middle letter has to start some down word.
        assert!(revise(&grid, &word_list, &mut domains, 0, 1));
        assert_eq!(domain_strings(&domains, &word_list, 0), vec!["CAR", "CAT"]);

        assert!(!revise(&grid, &word_list, &mut domains, 0, 1), "revise is stable once applied");
    }

    #[test]
    fn test_revise_ignores_self_support() {
        // AAA could only be supported by itself, which doesn't count.
        let grid = crossing_pair();
        let word_list = WordList::new(["aaa", "bbb"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        assert!(revise(&grid, &word_list, &mut domains, 0, 1));
        assert!(domains.is_empty(0));
    }

    #[test]
    fn test_revise_without_overlap_is_noop() {
        let grid = GridConfig::from_template_str(
            "
            ___
            ###
            ___
            ",
        )
        .unwrap();
        let word_list = WordList::new(["cat", "dog"]);
        let mut domains = Domains::new(&grid, &word_list);
        let before = domains.clone();

        assert!(!revise(&grid, &word_list, &mut domains, 0, 1));
        assert!(!revise(&grid, &word_list, &mut domains, 0, 0));
        assert_eq!(domains, before);
    }

    /// ..#
    /// ___
    /// ##_
    #[test]
    fn test_arc_consistency_prunes_cat() {
        // The across word's last letter is the down word's middle letter.
        let grid = GridConfig::from_variables(
            3,
            3,
            vec![Variable::new(1, 0, Across, 3), Variable::new(0, 2, Down, 3)],
        )
        .unwrap();
        assert_eq!(grid.overlap(0, 1), Some((2, 1)));
        let word_list = WordList::new(["cat", "car", "art"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        let result = enforce_arc_consistency(&grid, &word_list, &mut domains, None).unwrap();

        assert!(result.revisions > 0);
        assert_eq!(domain_strings(&domains, &word_list, 0), vec!["CAR"]);
        assert_eq!(domain_strings(&domains, &word_list, 1), vec!["ART"]);
        assert_arc_consistent(&grid, &word_list, &domains);
    }

    #[test]
    fn test_arc_consistency_keeps_every_supported_word() {
        let grid = crossing_pair();
        let word_list = WordList::new(["cat", "car", "art"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        enforce_arc_consistency(&grid, &word_list, &mut domains, None).unwrap();

        // Both CAR and CAT have an A in the middle to share with ART.
        assert_eq!(domain_strings(&domains, &word_list, 0), vec!["CAR", "CAT"]);
        assert_eq!(domain_strings(&domains, &word_list, 1), vec!["ART"]);
        assert_arc_consistent(&grid, &word_list, &domains);
    }

    #[test]
    fn test_arc_consistency_fails_on_empty_domain() {
        let grid = crossing_pair();
        let word_list = WordList::new(["xyz", "abc"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        let result = enforce_arc_consistency(&grid, &word_list, &mut domains, None);

        let failure = result.unwrap_err();
        assert!(domains.is_empty(failure.exhausted_variable_id));
    }

    #[test]
    fn test_arc_consistency_on_larger_grid() {
        let grid = GridConfig::from_template_str(
            "
            #___#
            #_##_
            #_##_
            #_##_
            #____
            ",
        )
        .unwrap();
        let word_list = WordList::new([
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
        ]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        enforce_arc_consistency(&grid, &word_list, &mut domains, None).unwrap();

        assert_arc_consistent(&grid, &word_list, &domains);
        for id in 0..grid.variable_count() {
            assert!(!domains.is_empty(id));
        }
    }

    #[test]
    fn test_arc_consistency_with_explicit_arcs() {
        let grid = crossing_pair();
        let word_list = WordList::new(["cat", "car", "art"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);

        // Only revising the down word against the across word: ART is the only down word
        // starting with a letter found in the middle of an across word.
        enforce_arc_consistency(&grid, &word_list, &mut domains, Some(&[(1, 0)])).unwrap();

        assert_eq!(domain_strings(&domains, &word_list, 1), vec!["ART"]);
        assert_eq!(domains.len(0), 3, "the across word was never revised");
    }
}
