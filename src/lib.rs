//! Client side of the kmre launcher and manager services.
//!
//! Every call opens a fresh stream socket to the service, sends one tagged
//! frame, optionally reads one reply, and closes the socket again.
//!
//! ```ignore
//! use kmre_client::app::Client;
//!
//! let client = Client::default();
//! let apps = client.installed_apps()?;
//! ```

pub mod app;
pub mod channel;
pub mod endpoint;
pub mod error;
pub mod host;
pub mod ipc;
pub mod messages;
pub mod protocol;

#[cfg(test)]
mod e2e;

pub use app::Client;
pub use channel::{CHUNK_SIZE, Channel, ChannelState, Timeouts};
pub use endpoint::{Endpoint, SocketRoot};
pub use error::{ClientError, ClientResult, TransportError};
