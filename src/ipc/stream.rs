//! Byte-exact send and receive over a connected [`Transport`].

use nix::{errno::Errno, sys::socket::MsgFlags};
use std::time::Duration;
use tracing::{error, warn};

use super::Transport;
use crate::error::{TransportError, TransportResult};

/// Send the whole of `buf`, retrying the unsent remainder until done.
///
/// Interrupted sends are retried. Any other failure aborts with whatever was
/// already sent left sent.
pub fn write_fully<T: Transport + ?Sized>(io: &mut T, buf: &[u8]) -> TransportResult<()> {
    let mut sent = 0;
    while sent < buf.len() {
        match io.send(&buf[sent..]) {
            Ok(0) => {
                error!("send made no progress after {sent} of {} bytes", buf.len());
                return Err(TransportError::WriteZero);
            }
            Ok(n) => sent += n,
            Err(Errno::EINTR) => continue,
            Err(e) => {
                error!("send failed after {sent} of {} bytes: {e}", buf.len());
                return Err(TransportError::Send(e));
            }
        }
    }
    Ok(())
}

/// Block until `buf` is full or the peer stops sending.
///
/// Returns the number of bytes read, which is less than `buf.len()` only when
/// the stream ended early. Zero bytes is reported as [`TransportError::Closed`].
pub fn read_buf<T: Transport + ?Sized>(io: &mut T, buf: &mut [u8]) -> TransportResult<usize> {
    if buf.is_empty() {
        return Err(TransportError::InvalidArgument);
    }
    recv_once(io, buf, MsgFlags::MSG_WAITALL)
}

/// Like [`read_buf`], bounded by a receive timeout.
///
/// If the timeout cannot be applied the read falls back to taking whatever is
/// immediately available instead of waiting for a full buffer.
pub fn read_buf_with_timeout<T: Transport + ?Sized>(
    io: &mut T,
    buf: &mut [u8],
    timeout: Duration,
) -> TransportResult<usize> {
    if buf.is_empty() {
        return Err(TransportError::InvalidArgument);
    }
    match io.set_recv_timeout(timeout) {
        Ok(()) => recv_once(io, buf, MsgFlags::MSG_WAITALL),
        Err(e) => {
            warn!("setsockopt(SO_RCVTIMEO) failed: {e}, reading without timeout");
            recv_once(io, buf, MsgFlags::empty())
        }
    }
}

/// Apply independent send and receive deadlines.
///
/// A failed send deadline is only logged; the result is that of the receive deadline.
pub fn set_timeout<T: Transport + ?Sized>(
    io: &mut T,
    send: Duration,
    recv: Duration,
) -> TransportResult<()> {
    if let Err(e) = io.set_send_timeout(send) {
        warn!("setsockopt(SO_SNDTIMEO) failed: {e}");
    }
    io.set_recv_timeout(recv).map_err(|e| {
        warn!("setsockopt(SO_RCVTIMEO) failed: {e}");
        TransportError::TimeoutConfig(e)
    })
}

fn recv_once<T: Transport + ?Sized>(
    io: &mut T,
    buf: &mut [u8],
    flags: MsgFlags,
) -> TransportResult<usize> {
    loop {
        match io.recv(buf, flags) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => return Ok(n),
            // nothing was consumed, so the read can be reissued as is
            Err(Errno::EINTR) => {}
            Err(Errno::EAGAIN) => {
                error!("read buf timed out");
                return Err(TransportError::TimedOut);
            }
            Err(e) => {
                error!("read buf failed: {e}");
                return Err(TransportError::Read(e));
            }
        }
    }
}
