pub mod check;
pub mod constants;
pub mod options;

pub use check::*;
pub use constants::*;
pub use options::*;
