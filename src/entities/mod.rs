// Entity Models
//
// Regions own branches, branches own reviews. Ids are the source of truth;
// names and counters copied onto child/parent records are denormalized and
// reconciled when an engine snapshot is built.

pub mod region;
pub mod branch;
pub mod review;

pub use region::{Region, RegionRegistry};
pub use branch::{Branch, BranchRegistry};
pub use review::{Rating, Review, ReviewView, Sentiment};
