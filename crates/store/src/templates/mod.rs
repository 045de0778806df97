//! Invoice template persistence
//!
//! This module provides:
//! - The slot-level persistence boundary and its degrade policies
//! - The template store (CRUD, duplicate, import/export, active selection)

mod persistence;
mod store;
mod error;


pub use persistence::*;
pub use store::*;
pub use error::*;
