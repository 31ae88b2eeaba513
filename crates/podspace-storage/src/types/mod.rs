//! Type definitions for podspace storage.

mod blocks;
mod chat;
mod content;
mod ids;
mod invitations;
mod pods;
mod users;

// Re-export all types from submodules
pub use blocks::*;
pub use chat::*;
pub use content::*;
pub use ids::*;
pub use invitations::*;
pub use pods::*;
pub use users::*;
