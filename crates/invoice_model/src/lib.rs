//! Invoice Model - Template layout and sync contract types
//!
//! This crate provides the data shapes shared by the invoice application:
//! invoice-layout templates (company info, palette, fonts, sections, custom
//! fields, page layout) and the POS synchronization contracts.

mod error;
mod template;
mod layout;
mod patch;
pub mod sync;

pub use error::*;
pub use template::*;
pub use layout::*;
pub use patch::*;
