/// Index of a record in the loaded dataset.
///
/// Ids are assigned in feature order at load time and never reused within a
/// session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(pub u32);

impl RecordId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Cluster identifier as reported by the map surface's clustered source.
///
/// Only meaningful for the zoom level and data generation it was reported at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(pub u64);
