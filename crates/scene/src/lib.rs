pub mod filter;
pub mod layout;
pub mod selection;
pub mod spiderfy;
pub mod store;

pub use filter::{FilterState, YearSelection};
pub use layout::{LeafLayout, LegPlacement, SpiralLayout};
pub use selection::RecordSet;
pub use spiderfy::*;
pub use store::RecordStore;
