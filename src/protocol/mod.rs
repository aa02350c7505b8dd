//! Wire format of the quiz backend.

mod messages;

pub use messages::*;
