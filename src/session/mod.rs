pub mod coordinator;
pub mod error;
pub mod registry;
#[cfg(test)]
pub mod testing;

pub use coordinator::SessionCoordinator;
pub use error::SessionError;
pub use registry::{ClientSink, Connection, ConnectionRegistry};
