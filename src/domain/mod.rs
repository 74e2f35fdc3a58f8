//! Domain modules: one per Glif resource.
//!
//! Each module owns the record types decoded from its endpoints. Unknown
//! response fields are kept in an `extra` map rather than dropped.

pub mod glif;
pub mod run;
pub mod sphere;
pub mod user;
