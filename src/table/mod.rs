pub mod notification;
pub mod controller;

pub use notification::*;
pub use controller::*;
