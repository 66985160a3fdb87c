pub mod action;
pub mod context;
pub mod enums;
pub mod learning;

pub use action::*;
pub use context::*;
pub use enums::*;
pub use learning::*;
