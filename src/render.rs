use crate::assignment::Assignment;
use crate::grid_config::GridConfig;
use crate::word_list::WordList;

/// Character drawn for blocked cells.
pub const BLOCK: char = '█';

/// Lay the assigned words out on the grid. Cells that are blocked, or open but not covered by any
/// assigned word, are `None`.
pub fn letter_grid(
    grid: &GridConfig,
    word_list: &WordList,
    assignment: &Assignment,
) -> Vec<Vec<Option<char>>> {
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; grid.width]; grid.height];

    for (id, word_id) in assignment.iter() {
        let variable = grid.variable(id);

        for (cell_idx, &glyph) in word_list[word_id].glyphs.iter().enumerate() {
            let (row, col) = variable.cell(cell_idx);
            if let Some(cell) = letters.get_mut(row).and_then(|line| line.get_mut(col)) {
                *cell = Some(glyph);
            }
        }
    }

    letters
}

/// Turn the given grid and assignment into a rendered string, one line per row.
pub fn render_grid(grid: &GridConfig, word_list: &WordList, assignment: &Assignment) -> String {
    letter_grid(grid, word_list, assignment)
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(|(col, letter)| {
                    if grid.is_open(row, col) {
                        letter.unwrap_or(' ')
                    } else {
                        BLOCK
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
