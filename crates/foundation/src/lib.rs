pub mod geo;
pub mod hash;
pub mod ids;
pub mod text_list;
pub mod year;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use hash::*;
pub use ids::*;
pub use text_list::*;
pub use year::*;
