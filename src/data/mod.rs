pub mod bar;
pub mod loader;

pub use bar::{Bar, BarError};
pub use loader::{filter_by_symbol, load_csv};
