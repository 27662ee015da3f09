pub mod engine;
pub mod response;
pub mod protocol;

pub use engine::*;
pub use response::*;
pub use protocol::*;

#[cfg(test)]
pub(crate) mod testing;
