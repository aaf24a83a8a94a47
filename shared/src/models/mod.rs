//! Data models
//!
//! Shared between the console client and the adapter backend (via API).
//! All fields are camelCase on the wire; IDs are backend-assigned opaque
//! strings.

pub mod member;
pub mod reference;

// Re-exports
pub use member::*;
pub use reference::*;
