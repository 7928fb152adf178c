pub mod entity;
pub mod error;
pub mod port;

pub use entity::{Command, Reply};
pub use error::BridgeError;
pub use port::CommandGateway;
