//! The static shape of a crossword: which cells are open, which word slots ("variables") they
//! form, and where those slots cross each other. Nothing in here changes once a `GridConfig` has
//! been built.

use std::collections::HashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::path::Path;

use smallvec::SmallVec;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given variable, based on its index in the grid's `variable_configs` field.
pub type VariableId = usize;

/// Zero-indexed row and column for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a variable is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A word slot in the grid. Variables are plain values: two variables with the same start cell,
/// direction and length are the same variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable { row, col, direction, length }
    }

    /// The coords of the cell at the given index within this variable.
    pub fn cell(&self, cell_idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.row, self.col + cell_idx),
            Direction::Down => (self.row + cell_idx, self.col),
        }
    }

    /// Generate the coords for each cell of this variable.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.length).map(|cell_idx| self.cell(cell_idx))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-letter {} at ({}, {})",
            self.length, self.direction, self.row, self.col
        )
    }
}

/// A struct representing a crossing between one variable and another, referencing the other
/// variable's id and the location of the intersection within the other variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable_id: VariableId,
    pub other_cell: usize,
}

/// A variable along with the crossing information derived from the grid geometry.
pub struct VariableConfig {
    pub id: VariableId,
    pub variable: Variable,

    /// Indexed by cell; `Some` wherever another variable passes through that cell.
    pub crossings: SmallVec<[Option<Crossing>; MAX_SLOT_LENGTH]>,

    /// Ids of every variable crossing this one, in cell order.
    pub neighbors: SmallVec<[VariableId; MAX_SLOT_LENGTH]>,
}

impl Debug for VariableConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableConfig")
            .field("id", &self.id)
            .field("variable", &self.variable)
            .field("neighbors", &self.neighbors)
            .finish()
    }
}

/// Problems with a grid description. These are all caught while building the `GridConfig`, so
/// the solver itself never sees a malformed grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("structure has no rows")]
    Empty,

    #[error("invalid character '{ch}' at row {row}, column {col} (expected '_', '.' or '#')")]
    InvalidCell { row: usize, col: usize, ch: char },

    #[error("{variable} has zero length")]
    ZeroLength { variable: Variable },

    #[error("{variable} does not fit in a {height}x{width} grid")]
    OutOfBounds {
        variable: Variable,
        height: usize,
        width: usize,
    },

    #[error("{variable} appears more than once")]
    DuplicateVariable { variable: Variable },

    #[error("{first} and {second} both pass through cell {cell:?} in the same direction")]
    ConflictingVariables {
        first: Variable,
        second: Variable,
        cell: GridCoord,
    },

    #[error("could not read structure file: {0}")]
    Io(#[from] std::io::Error),
}

/// A struct representing the aspects of a grid that are static during filling.
pub struct GridConfig {
    pub height: usize,
    pub width: usize,

    /// `structure[row][col]` is true for cells that hold a letter.
    structure: Vec<Vec<bool>>,

    pub variable_configs: Vec<VariableConfig>,

    ids_by_variable: HashMap<Variable, VariableId>,
}

impl Debug for GridConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridConfig")
            .field("height", &self.height)
            .field("width", &self.width)
            .field("variable_configs", &self.variable_configs)
            .finish()
    }
}

/// Collect every run of at least two open cells in each row of `template`, as `(row, col)`
/// coords.
fn build_words(template: &[Vec<bool>]) -> Vec<Vec<GridCoord>> {
    let mut result: Vec<Vec<GridCoord>> = vec![];

    for (row, line) in template.iter().enumerate() {
        let mut current_word_coords: Vec<GridCoord> = vec![];

        for (col, &open) in line.iter().enumerate() {
            if open {
                current_word_coords.push((row, col));
            } else {
                if current_word_coords.len() > 1 {
                    result.push(current_word_coords);
                }
                current_word_coords = vec![];
            }
        }

        if current_word_coords.len() > 1 {
            result.push(current_word_coords);
        }
    }

    result
}

impl GridConfig {
    /// Build a grid from a structure template, with `_` or `.` representing open cells and `#`
    /// representing blocks. Blank lines and surrounding whitespace are ignored, and rows shorter
    /// than the widest row are padded with blocks.
    pub fn from_template_str(template: &str) -> Result<GridConfig, GridError> {
        let rows: Vec<&str> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.is_empty() {
            return Err(GridError::Empty);
        }

        let height = rows.len();
        let width = rows.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let mut structure: Vec<Vec<bool>> = vec![vec![false; width]; height];
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                structure[row][col] = match ch {
                    '_' | '.' => true,
                    '#' => false,
                    _ => return Err(GridError::InvalidCell { row, col, ch }),
                };
            }
        }

        let mut variables: Vec<Variable> = build_words(&structure)
            .into_iter()
            .map(|coords| Variable::new(coords[0].0, coords[0].1, Direction::Across, coords.len()))
            .collect();

        let transposed: Vec<Vec<bool>> = (0..width)
            .map(|col| (0..height).map(|row| structure[row][col]).collect())
            .collect();

        // Rows of the transposed structure are columns, so the coords come back as (col, row).
        variables.extend(
            build_words(&transposed)
                .into_iter()
                .map(|coords| Variable::new(coords[0].1, coords[0].0, Direction::Down, coords.len())),
        );

        GridConfig::build(height, width, structure, variables)
    }

    /// Native-only convenience method: read a structure template from a file and parse it.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<GridConfig, GridError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        GridConfig::from_template_str(&contents)
    }

    /// Build a grid from an explicit set of variables. Every cell covered by a variable is open;
    /// everything else is a block.
    pub fn from_variables(
        height: usize,
        width: usize,
        variables: Vec<Variable>,
    ) -> Result<GridConfig, GridError> {
        let mut structure: Vec<Vec<bool>> = vec![vec![false; width]; height];

        for variable in &variables {
            if variable.length == 0 {
                return Err(GridError::ZeroLength { variable: *variable });
            }

            let (last_row, last_col) = variable.cell(variable.length - 1);
            if last_row >= height || last_col >= width {
                return Err(GridError::OutOfBounds { variable: *variable, height, width });
            }

            for (row, col) in variable.cells() {
                structure[row][col] = true;
            }
        }

        GridConfig::build(height, width, structure, variables)
    }

    /// Shared tail of the constructors: index the variables and work out the crossings.
    fn build(
        height: usize,
        width: usize,
        structure: Vec<Vec<bool>>,
        variables: Vec<Variable>,
    ) -> Result<GridConfig, GridError> {
        let mut ids_by_variable: HashMap<Variable, VariableId> =
            HashMap::with_capacity(variables.len());

        // (variable id, cell index within variable) for every variable passing through a cell.
        let mut entries_by_cell: HashMap<GridCoord, SmallVec<[(VariableId, usize); 2]>> =
            HashMap::new();

        for (id, variable) in variables.iter().enumerate() {
            if ids_by_variable.insert(*variable, id).is_some() {
                return Err(GridError::DuplicateVariable { variable: *variable });
            }

            for (cell_idx, cell) in variable.cells().enumerate() {
                let entries = entries_by_cell.entry(cell).or_default();

                if let Some(&(other_id, _)) = entries
                    .iter()
                    .find(|&&(other_id, _)| variables[other_id].direction == variable.direction)
                {
                    return Err(GridError::ConflictingVariables {
                        first: variables[other_id],
                        second: *variable,
                        cell,
                    });
                }

                entries.push((id, cell_idx));
            }
        }

        let mut variable_configs: Vec<VariableConfig> = variables
            .iter()
            .enumerate()
            .map(|(id, &variable)| VariableConfig {
                id,
                variable,
                crossings: (0..variable.length).map(|_| None).collect(),
                neighbors: SmallVec::new(),
            })
            .collect();

        // Each cell holds at most one across and one down entry, so any cell with two entries is
        // a crossing in both directions.
        for entries in entries_by_cell.values() {
            if let [(first_id, first_cell), (second_id, second_cell)] = entries[..] {
                variable_configs[first_id].crossings[first_cell] = Some(Crossing {
                    other_variable_id: second_id,
                    other_cell: second_cell,
                });
                variable_configs[second_id].crossings[second_cell] = Some(Crossing {
                    other_variable_id: first_id,
                    other_cell: first_cell,
                });
            }
        }

        for variable_config in &mut variable_configs {
            variable_config.neighbors = variable_config
                .crossings
                .iter()
                .flatten()
                .map(|crossing| crossing.other_variable_id)
                .collect();
        }

        Ok(GridConfig { height, width, structure, variable_configs, ids_by_variable })
    }

    /// How many variables does this grid have?
    pub fn variable_count(&self) -> usize {
        self.variable_configs.len()
    }

    /// All variables in the grid, in `VariableId` order.
    pub fn variables(&self) -> impl ExactSizeIterator<Item = Variable> + '_ {
        self.variable_configs.iter().map(|variable_config| variable_config.variable)
    }

    pub fn variable(&self, id: VariableId) -> Variable {
        self.variable_configs[id].variable
    }

    /// Look up the id of a variable by value.
    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.ids_by_variable.get(variable).copied()
    }

    /// The variables sharing a cell with `id`.
    pub fn neighbors(&self, id: VariableId) -> &[VariableId] {
        &self.variable_configs[id].neighbors
    }

    /// The `(index in x, index in y)` of the cell shared by `x` and `y`, if they cross at all.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.variable_configs[x]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing)| match crossing {
                Some(crossing) if crossing.other_variable_id == y => {
                    Some((cell_idx, crossing.other_cell))
                }
                _ => None,
            })
    }

    /// Does the cell at `(row, col)` hold a letter? Cells outside the grid don't.
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        self.structure
            .get(row)
            .and_then(|line| line.get(col))
            .copied()
            .unwrap_or(false)
    }
}
