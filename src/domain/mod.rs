pub mod classify;
pub mod color;
pub mod filter;
pub mod record;

pub use classify::*;
pub use color::*;
pub use filter::*;
pub use record::*;
