//! Shared documentation and diff models consumed by the core library and backend crates.

pub mod api_diff;
pub mod content;
pub mod docs;
pub mod package;
pub mod preview;

pub use api_diff::*;
pub use content::*;
pub use docs::*;
pub use package::*;
pub use preview::*;
