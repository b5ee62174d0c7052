pub mod backoff;
pub mod connection;
pub mod runtime;

pub use backoff::Backoff;
pub use connection::{Connection, NetError};
pub use runtime::ClientRuntime;
