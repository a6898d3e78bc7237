use std::collections::HashMap;

use bit_set::BitSet;

use crate::grid_config::{GridConfig, VariableId};
use crate::word_list::{WordId, WordList};

/// How many words in a domain hold each letter in a given cell.
pub type GlyphCounts = HashMap<char, usize>;

/// The set of words still considered possible for each variable, stored as a bit set over
/// `WordId` per variable.
///
/// Only the consistency engine narrows domains (through `retain`); search borrows them
/// immutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    by_variable: Vec<BitSet>,
}

impl Domains {
    /// Seed every variable's domain with the entire vocabulary.
    pub fn new(grid: &GridConfig, word_list: &WordList) -> Domains {
        let full: BitSet = (0..word_list.len()).collect();

        Domains { by_variable: (0..grid.variable_count()).map(|_| full.clone()).collect() }
    }

    pub fn get(&self, id: VariableId) -> &BitSet {
        &self.by_variable[id]
    }

    /// How many words remain for this variable?
    pub fn len(&self, id: VariableId) -> usize {
        self.by_variable[id].len()
    }

    pub fn is_empty(&self, id: VariableId) -> bool {
        self.by_variable[id].is_empty()
    }

    pub fn contains(&self, id: VariableId, word_id: WordId) -> bool {
        self.by_variable[id].contains(word_id)
    }

    pub fn iter(&self, id: VariableId) -> impl Iterator<Item = WordId> + '_ {
        self.by_variable[id].iter()
    }

    /// Drop every word of `id`'s domain for which `keep` returns false. Returns whether anything
    /// was removed.
    pub(crate) fn retain<F>(&mut self, id: VariableId, mut keep: F) -> bool
    where
        F: FnMut(WordId) -> bool,
    {
        let doomed: Vec<WordId> = self.by_variable[id].iter().filter(|&word_id| !keep(word_id)).collect();

        let domain = &mut self.by_variable[id];
        for &word_id in &doomed {
            domain.remove(word_id);
        }

        !doomed.is_empty()
    }

    /// Count, for the given cell of `id`, how many remaining words place each letter there.
    /// Words too short to reach the cell aren't counted.
    pub fn glyph_counts(&self, word_list: &WordList, id: VariableId, cell_idx: usize) -> GlyphCounts {
        let mut counts = GlyphCounts::new();

        for word_id in self.iter(id) {
            if let Some(&glyph) = word_list[word_id].glyphs.get(cell_idx) {
                *counts.entry(glyph).or_insert(0) += 1;
            }
        }

        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_config::Direction::{Across, Down};
    use crate::grid_config::Variable;

    fn two_variable_grid() -> GridConfig {
        GridConfig::from_variables(
            3,
            3,
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 1, Down, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_seeded_with_full_vocabulary() {
        let word_list = WordList::new(["cat", "car", "art", "gold"]);
        let domains = Domains::new(&two_variable_grid(), &word_list);

        assert_eq!(domains.len(0), 4);
        assert_eq!(domains.len(1), 4);
        assert!(domains.contains(1, word_list.id_of("gold").unwrap()));
    }

    #[test]
    fn test_retain_reports_changes() {
        let word_list = WordList::new(["cat", "car", "art"]);
        let mut domains = Domains::new(&two_variable_grid(), &word_list);
        let art = word_list.id_of("art").unwrap();

        assert!(!domains.retain(0, |_| true));
        assert!(domains.retain(0, |word_id| word_id == art));
        assert_eq!(domains.iter(0).collect::<Vec<_>>(), vec![art]);
        assert_eq!(domains.len(1), 3, "other domains are untouched");
    }

    #[test]
    fn test_glyph_counts() {
        let word_list = WordList::new(["cat", "car", "art", "at"]);
        let domains = Domains::new(&two_variable_grid(), &word_list);

        let counts = domains.glyph_counts(&word_list, 0, 2);
        assert_eq!(counts.get(&'T'), Some(&2));
        assert_eq!(counts.get(&'R'), Some(&1));
        assert_eq!(counts.get(&'A'), None);
    }
}
