//! .

use nix::sys::socket::{self, AddressFamily, SockFlag, SockType, UnixAddr};
use std::{os::fd::AsRawFd, path::Path};
use tracing::error;

use super::SocketHandle;
use crate::error::{TransportError, TransportResult};

/// Open a stream socket and connect it to the filesystem address `path`.
///
/// A socket that fails to connect is closed before the error is returned.
pub fn connect_socket(path: &Path) -> TransportResult<SocketHandle> {
    let fd = socket::socket(
        AddressFamily::Unix,
        SockType::Stream,
        SockFlag::SOCK_CLOEXEC,
        None,
    )
    .map_err(|e| {
        error!("socket error: {e}");
        TransportError::SocketCreate(e)
    })?;

    let connect_err = |source| {
        error!("connect to {} failed: {source}", path.display());
        TransportError::Connect {
            path: path.to_path_buf(),
            source,
        }
    };
    let addr = UnixAddr::new(path).map_err(connect_err)?;
    socket::connect(fd.as_raw_fd(), &addr).map_err(connect_err)?;

    Ok(SocketHandle::from(fd))
}
