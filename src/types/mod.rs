//! Type definitions

pub mod location;
pub mod pricing;
pub mod report;
pub mod station;
pub mod vehicle;

pub use location::*;
pub use pricing::*;
pub use report::*;
pub use station::*;
pub use vehicle::*;
