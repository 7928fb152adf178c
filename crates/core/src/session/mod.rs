pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod port;

pub use error::SessionError;
pub use port::Session;
