pub mod assignment;
pub mod backtracking_search;
pub mod consistency;
pub mod domains;
pub mod grid_config;
pub mod heuristics;
pub mod log;
pub mod render;
pub mod word_list;

pub use assignment::Assignment;
pub use backtracking_search::{find_fill, solve, FillFailure, FillOptions, FillSuccess, Statistics};
pub use grid_config::{Direction, GridConfig, GridError, Variable, VariableId};
pub use render::{letter_grid, render_grid};
pub use word_list::{WordId, WordList, WordListError};

/// The expected maximum length for a single slot. Longer slots still work, they just spill their
/// per-cell tables onto the heap.
pub const MAX_SLOT_LENGTH: usize = 21;
