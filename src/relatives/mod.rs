pub mod relation;
pub mod record;
pub mod codec;
pub mod document;

pub use relation::*;
pub use record::*;
pub use codec::*;
pub use document::*;
