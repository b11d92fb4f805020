//! Service area & home-visit logistics engine.
//!
//! Pure computation over tenant service-area records: geometry, boundary
//! validation, zone matching, travel surcharge calculation, and visit route
//! optimization. Nothing in here touches the database or holds mutable
//! state; handlers fetch records and pass them in.

pub mod boundary;
pub mod distance;
pub mod geometry;
pub mod matcher;
pub mod route;
pub mod surcharge;
