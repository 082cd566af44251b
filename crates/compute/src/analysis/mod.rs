pub mod statistics;
pub mod temporal;

pub use statistics::{EventStatistics, LabelCount, YearBar};
pub use temporal::{EMPTY_YEAR_RANGE, available_years, year_range};
