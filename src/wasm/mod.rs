pub mod tau;
pub mod handle;

pub use tau::*;
pub use handle::*;
