pub mod csv;
pub mod debounce;
pub mod table;

pub use csv::{CsvRow, to_csv};
pub use debounce::SearchDebouncer;
pub use table::{Selection, SortState, TableController};
