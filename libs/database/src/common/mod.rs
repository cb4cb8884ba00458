//! Types shared by every backend module.

pub mod error;

pub use error::{DatabaseError, DatabaseResult};
