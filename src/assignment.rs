use std::collections::BTreeMap;

use crate::grid_config::{GridConfig, Variable, VariableId};
use crate::word_list::{WordId, WordList};

/// A partial or complete mapping from variables to chosen words.
///
/// Assigning a variable that is out of range or already assigned is a bug in the caller, so those
/// calls panic instead of quietly corrupting the search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    word_ids: Vec<Option<WordId>>,
    assigned_count: usize,
}

impl Assignment {
    /// An empty assignment for a grid with `variable_count` variables.
    pub fn new(variable_count: usize) -> Assignment {
        Assignment { word_ids: vec![None; variable_count], assigned_count: 0 }
    }

    pub fn assign(&mut self, id: VariableId, word_id: WordId) {
        let variable_count = self.word_ids.len();
        let slot = self
            .word_ids
            .get_mut(id)
            .unwrap_or_else(|| panic!("Variable {id} is out of range for {variable_count} variables"));

        if let Some(existing) = slot {
            panic!("Variable {id} is already assigned word {existing}");
        }

        *slot = Some(word_id);
        self.assigned_count += 1;
    }

    /// Undo the assignment for `id`, returning the word it held.
    pub fn unassign(&mut self, id: VariableId) -> Option<WordId> {
        let removed = self.word_ids[id].take();
        if removed.is_some() {
            self.assigned_count -= 1;
        }
        removed
    }

    pub fn get(&self, id: VariableId) -> Option<WordId> {
        self.word_ids.get(id).copied().flatten()
    }

    pub fn is_assigned(&self, id: VariableId) -> bool {
        self.get(id).is_some()
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.assigned_count
    }

    pub fn is_empty(&self) -> bool {
        self.assigned_count == 0
    }

    /// Every `(variable id, word id)` pair currently assigned, in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.word_ids
            .iter()
            .enumerate()
            .filter_map(|(id, word_id)| word_id.map(|word_id| (id, word_id)))
    }

    /// Does every variable in the grid hold a word from the vocabulary?
    pub fn is_complete(&self, grid: &GridConfig, word_list: &WordList) -> bool {
        (0..grid.variable_count())
            .all(|id| matches!(self.get(id), Some(word_id) if word_id < word_list.len()))
    }

    /// Check the whole assignment: every word fits its variable's length, no word is used twice,
    /// and crossing variables agree on their shared letter.
    pub fn is_consistent(&self, grid: &GridConfig, word_list: &WordList) -> bool {
        let assigned: Vec<(VariableId, WordId)> = self.iter().collect();

        for (idx, &(x, x_word_id)) in assigned.iter().enumerate() {
            let x_word = &word_list[x_word_id];
            if x_word.len() != grid.variable(x).length {
                return false;
            }

            for &(y, y_word_id) in &assigned[idx + 1..] {
                if x_word_id == y_word_id {
                    return false;
                }

                if let Some((x_cell, y_cell)) = grid.overlap(x, y) {
                    if x_word.glyphs.get(x_cell) != word_list[y_word_id].glyphs.get(y_cell) {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Resolve ids into variables and word strings.
    pub fn to_words(&self, grid: &GridConfig, word_list: &WordList) -> BTreeMap<Variable, String> {
        self.iter()
            .map(|(id, word_id)| (grid.variable(id), word_list[word_id].string.clone()))
            .collect()
    }
}
