pub mod context;

// Re-export public items
pub use context::{AuthContext, SessionUser};
