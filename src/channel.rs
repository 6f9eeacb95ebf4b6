//! One-shot framed request/reply channel to a kmre service.
//!
//! A channel is opened for exactly one exchange:
//!
//! ```text
//! Unconnected --connect()--> Connected --close()/drop--> Closed
//! ```
//!
//! Replies carry no length, so [`Channel::receive_bytes`] reads fixed-size
//! chunks until one comes back short. A reply that is an exact multiple of
//! [`CHUNK_SIZE`] is terminated by the peer closing the stream.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, error};

use crate::{
    endpoint::{Endpoint, SocketRoot, resolve_endpoint},
    error::{ClientError as Error, ClientResult as Result, TransportError},
    ipc::{SocketHandle, Transport, client::connect_socket, stream},
    protocol::{self, CommandTag, Message},
};

/// Unit of the reply reassembly loop.
pub const CHUNK_SIZE: usize = 2048;

/// Send and receive deadlines, 2 s each unless a caller says otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub send: Duration,
    pub recv: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            send: Duration::from_secs(2),
            recv: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    Unconnected,
    Connected,
    Closed,
}

impl ChannelState {
    fn name(self) -> &'static str {
        match self {
            ChannelState::Unconnected => "unconnected",
            ChannelState::Connected => "connected",
            ChannelState::Closed => "closed",
        }
    }
}

#[derive(Debug)]
enum Link {
    Unconnected,
    Connected(SocketHandle),
    Closed,
}

/// A channel sending `Req` and expecting `Req::Reply` back.
#[derive(Debug)]
pub struct Channel<Req> {
    path: PathBuf,
    link: Link,
    _schema: PhantomData<fn(&Req)>,
}

impl<Req> Channel<Req> {
    /// Channel to `endpoint` of the current user under the default socket root.
    pub fn open(endpoint: Endpoint) -> Self {
        Self::at(resolve_endpoint(endpoint))
    }

    pub fn open_in(root: &SocketRoot, endpoint: Endpoint) -> Self {
        Self::at(root.resolve(endpoint))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            link: Link::Unconnected,
            _schema: PhantomData,
        }
    }

    #[cfg(test)]
    pub(crate) fn attached(path: impl Into<PathBuf>, handle: SocketHandle) -> Self {
        Self {
            path: path.into(),
            link: Link::Connected(handle),
            _schema: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> ChannelState {
        match self.link {
            Link::Unconnected => ChannelState::Unconnected,
            Link::Connected(_) => ChannelState::Connected,
            Link::Closed => ChannelState::Closed,
        }
    }

    /// Connect to the service socket. A missing socket file fails without a
    /// connection attempt.
    pub fn connect(&mut self) -> Result<()> {
        if !matches!(self.link, Link::Unconnected) {
            return Err(Error::InvalidState(self.state().name(), "unconnected"));
        }
        if !self.path.exists() {
            error!("Can't find socket file: '{}'", self.path.display());
            return Err(Error::SocketMissing(self.path.clone()));
        }
        let handle = connect_socket(&self.path).map_err(|e| {
            error!("connect to '{}' failed", self.path.display());
            Error::Connect(e)
        })?;
        debug!("connected to {}", self.path.display());
        self.link = Link::Connected(handle);
        Ok(())
    }

    pub fn configure_timeout(&mut self, timeouts: Timeouts) -> Result<()> {
        let handle = self.handle()?;
        stream::set_timeout(handle, timeouts.send, timeouts.recv).map_err(Error::TimeoutConfig)
    }

    /// Reassemble one reply from the stream, undecoded.
    pub fn receive_bytes(&mut self) -> Result<Bytes> {
        let handle = self.handle()?;
        reassemble(handle, None).map(Bytes::from)
    }

    /// Like [`Channel::receive_bytes`], with every chunk read bounded by `timeout`.
    pub fn receive_bytes_within(&mut self, timeout: Duration) -> Result<Bytes> {
        let handle = self.handle()?;
        reassemble(handle, Some(timeout)).map(Bytes::from)
    }

    /// Release the socket. Closing twice, or before connecting, does nothing.
    pub fn close(&mut self) {
        if let Link::Connected(_) = std::mem::replace(&mut self.link, Link::Closed) {
            debug!("closed {}", self.path.display());
        }
    }

    fn handle(&mut self) -> Result<&mut SocketHandle> {
        let state = self.state();
        match &mut self.link {
            Link::Connected(handle) => Ok(handle),
            _ => Err(Error::InvalidState(state.name(), "connected")),
        }
    }
}

impl<Req: Message> Channel<Req> {
    /// Send `msg` under the tag its schema is bound to.
    pub fn send(&mut self, msg: &Req) -> Result<()> {
        self.send_frame(msg, Req::COMMAND.tag())
    }

    /// Send `msg` as one frame under `tag`, which must be the tag `Req` is bound to.
    pub fn send_frame(&mut self, msg: &Req, tag: CommandTag) -> Result<()> {
        let frame = protocol::build_frame(msg, tag)?;
        let handle = self.handle()?;
        stream::write_fully(handle, &frame).map_err(|e| {
            error!("write frame {tag} to server failed");
            Error::Send(e)
        })?;
        debug!("sent frame {tag} ({} bytes)", frame.len());
        Ok(())
    }
}

impl<Req> Channel<Req>
where
    Req: Message,
    Req::Reply: DeserializeOwned,
{
    /// Read and decode the reply. Only commands that are answered have a
    /// decodable `Reply`, so fire-and-forget channels cannot call this.
    pub fn receive(&mut self) -> Result<Req::Reply> {
        let bytes = self.receive_bytes()?;
        protocol::decode(&bytes)
    }

    pub fn receive_within(&mut self, timeout: Duration) -> Result<Req::Reply> {
        let bytes = self.receive_bytes_within(timeout)?;
        protocol::decode(&bytes)
    }
}

/// Read chunks into a growing buffer until a read returns short.
///
/// A closed stream ends the reply at whatever was accumulated, which is how a
/// reply of an exact multiple of [`CHUNK_SIZE`] terminates.
pub(crate) fn reassemble<T: Transport + ?Sized>(
    io: &mut T,
    timeout: Option<Duration>,
) -> Result<Vec<u8>> {
    let mut reply = Vec::new();
    loop {
        let start = reply.len();
        let chunk = grow_chunk(&mut reply)?;
        let read = match timeout {
            Some(timeout) => stream::read_buf_with_timeout(io, chunk, timeout),
            None => stream::read_buf(io, chunk),
        };
        match read {
            Ok(n) if n == CHUNK_SIZE => continue,
            Ok(n) => {
                reply.truncate(start + n);
                break;
            }
            Err(TransportError::Closed) => {
                reply.truncate(start);
                break;
            }
            Err(e) => return Err(Error::Receive(e)),
        }
    }
    debug!("reassembled reply of {} bytes", reply.len());
    Ok(reply)
}

/// Append one zeroed chunk to `reply` and hand it out for reading. Capacity
/// grows geometrically, so a long reply is not copied on every chunk.
fn grow_chunk(reply: &mut Vec<u8>) -> Result<&mut [u8]> {
    let start = reply.len();
    reply.try_reserve(CHUNK_SIZE).map_err(|e| {
        error!("reply buffer could not grow past {start} bytes");
        Error::OutOfMemory(e)
    })?;
    reply.resize(start + CHUNK_SIZE, 0);
    Ok(&mut reply[start..])
}
