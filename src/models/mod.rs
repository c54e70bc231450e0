//! Data models for the tank backend.
//!
//! These are the JSON shapes exchanged over HTTP; the stores map them to and from documents.

mod id;
mod profile;
mod tank;

pub use id::*;
pub use profile::*;
pub use tank::*;
