//! Connection layer: endpoint, state tag, transport, and the manager that
//! keeps exactly one link to the device alive.

pub mod endpoint;
pub mod manager;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use endpoint::Endpoint;
pub use manager::{ConnectionManager, Session};
pub use state::ConnectionState;
pub use transport::{Connector, Link, WsConnector};
