pub mod channel;
pub mod constants;
pub mod error;
pub mod message;

pub use channel::ChannelId;
pub use constants::*;
pub use error::{Result, TransportError};
pub use message::{ChatPayload, TypingPayload};
