//! Lint rules
//!
//! Each rule owns its message catalog and config; the shared logic lives in
//! the index, selector, scope and patch modules.

pub mod max_params;
pub mod no_reexport;
pub mod no_single_use_type;
pub mod prefer_single_line;
pub mod types_before_use;

// Re-export rule structs
pub use max_params::{MaxParams, MaxParamsConfig};
pub use no_reexport::NoReexport;
pub use no_single_use_type::{NoSingleUseType, NoSingleUseTypeConfig};
pub use prefer_single_line::{PreferSingleLine, PreferSingleLineConfig};
pub use types_before_use::TypesBeforeUse;
