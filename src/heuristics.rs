//! Variable and value ordering for the backtracking search. Neither heuristic affects which
//! solutions exist, only how quickly one is found.

use std::cmp::Reverse;

use crate::assignment::Assignment;
use crate::domains::Domains;
use crate::grid_config::{GridConfig, VariableId};
use crate::word_list::{WordId, WordList};

/// Pick the unassigned variable with the fewest remaining options (MRV), breaking ties in favor of
/// the variable with the most neighbors. Anything still tied goes to the lowest id. Returns `None`
/// once every variable is assigned.
pub fn select_unassigned_variable(
    grid: &GridConfig,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<VariableId> {
    (0..grid.variable_count())
        .filter(|&id| !assignment.is_assigned(id))
        .min_by_key(|&id| (domains.len(id), Reverse(grid.neighbors(id).len())))
}

/// Return the domain of `id` ordered so that the word ruling out the fewest options for
/// unassigned neighbors comes first (LCV). A neighbor's option is ruled out when its letter in
/// the shared cell differs from the candidate's.
pub fn order_domain_values(
    grid: &GridConfig,
    word_list: &WordList,
    domains: &Domains,
    id: VariableId,
    assignment: &Assignment,
) -> Vec<WordId> {
    // For each unassigned neighbor: (cell in `id`, option count, letter counts in the shared cell).
    let neighbor_counts: Vec<_> = grid
        .neighbors(id)
        .iter()
        .filter(|&&neighbor_id| !assignment.is_assigned(neighbor_id))
        .filter_map(|&neighbor_id| {
            let (cell_idx, neighbor_cell_idx) = grid.overlap(id, neighbor_id)?;
            Some((
                cell_idx,
                domains.len(neighbor_id),
                domains.glyph_counts(word_list, neighbor_id, neighbor_cell_idx),
            ))
        })
        .collect();

    let mut options: Vec<WordId> = domains.iter(id).collect();

    options.sort_by_cached_key(|&word_id| {
        let glyphs = &word_list[word_id].glyphs;

        neighbor_counts
            .iter()
            .map(|(cell_idx, option_count, glyph_counts)| {
                let compatible = glyphs
                    .get(*cell_idx)
                    .and_then(|glyph| glyph_counts.get(glyph))
                    .copied()
                    .unwrap_or(0);
                option_count - compatible
            })
            .sum::<usize>()
    });

    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::enforce_node_consistency;
    use crate::grid_config::Direction::{Across, Down};
    use crate::grid_config::Variable;

    /// ___
    /// _##
    /// _##
    fn corner() -> GridConfig {
        GridConfig::from_variables(
            3,
            3,
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 0, Down, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_mrv_prefers_smaller_domain() {
        let grid = GridConfig::from_template_str(
            "
            ___
            ###
            ____
            ",
        )
        .unwrap();
        let word_list = WordList::new(["one", "two", "six", "nine"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);
        let assignment = Assignment::new(grid.variable_count());

        let four = grid.variable_id(&Variable::new(2, 0, Across, 4)).unwrap();
        assert_eq!(select_unassigned_variable(&grid, &domains, &assignment), Some(four));
    }

    #[test]
    fn test_degree_breaks_mrv_ties() {
        // The down word crosses two across words; each across word crosses only it.
        let grid = GridConfig::from_template_str(
            "
            ___
            _##
            ___
            ",
        )
        .unwrap();
        let word_list = WordList::new(["one", "two", "six"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);
        let assignment = Assignment::new(grid.variable_count());

        let down = grid.variable_id(&Variable::new(0, 0, Down, 3)).unwrap();
        assert_eq!(select_unassigned_variable(&grid, &domains, &assignment), Some(down));
    }

    #[test]
    fn test_full_ties_pick_a_tied_variable() {
        let grid = GridConfig::from_template_str(
            "
            ____
            ####
            ____
            ",
        )
        .unwrap();
        let word_list = WordList::new(["gold", "lead"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);
        let mut assignment = Assignment::new(grid.variable_count());

        let selected = select_unassigned_variable(&grid, &domains, &assignment).unwrap();
        assert!(selected < 2);

        assignment.assign(selected, 0);
        let next = select_unassigned_variable(&grid, &domains, &assignment).unwrap();
        assert_eq!(next, 1 - selected, "assigned variables are never selected");

        assignment.assign(next, 1);
        assert_eq!(select_unassigned_variable(&grid, &domains, &assignment), None);
    }

    #[test]
    fn test_lcv_orders_least_constraining_first() {
        let grid = corner();
        let word_list = WordList::new(["abc", "bcd", "bee", "bat", "cab"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);
        let assignment = Assignment::new(grid.variable_count());

        let across = grid.variable_id(&Variable::new(0, 0, Across, 3)).unwrap();
        let ordered = order_domain_values(&grid, &word_list, &domains, across, &assignment);
        let strings: Vec<&str> = ordered.iter().map(|&id| word_list[id].string.as_str()).collect();

        // Three down options start with B, one each with A and C.
        assert_eq!(strings, vec!["BAT", "BCD", "BEE", "ABC", "CAB"]);
    }

    #[test]
    fn test_lcv_ignores_assigned_neighbors() {
        let grid = corner();
        let word_list = WordList::new(["abc", "bcd", "bee", "bat", "cab"]);
        let mut domains = Domains::new(&grid, &word_list);
        enforce_node_consistency(&grid, &word_list, &mut domains);
        let mut assignment = Assignment::new(grid.variable_count());

        let across = grid.variable_id(&Variable::new(0, 0, Across, 3)).unwrap();
        let down = grid.variable_id(&Variable::new(0, 0, Down, 3)).unwrap();
        assignment.assign(down, word_list.id_of("cab").unwrap());

        let ordered = order_domain_values(&grid, &word_list, &domains, across, &assignment);
        let expected: Vec<WordId> = domains.iter(across).collect();
        assert_eq!(ordered, expected, "with no unassigned neighbors every word scores zero");
    }
}
