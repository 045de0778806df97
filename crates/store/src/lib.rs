//! Store - Template persistence for the invoice application
//!
//! This crate handles the durable collection of invoice templates and the
//! active-template selection over a pluggable key-value storage port, store
//! settings, and the webhook event queue interface.

mod error;
mod settings;
mod storage;
pub mod events;
pub mod templates;

pub use error::*;
pub use settings::*;
pub use storage::*;

// Re-export template functionality
pub use templates::{
    CollectionRead, LoadedCollection, TemplateError, TemplateResult, TemplateSlots, TemplateStore,
};

// Re-export event queue functionality
pub use events::{ingest, poll, EventQueue, MemoryEventQueue, WebhookAck, WebhookEvent};
