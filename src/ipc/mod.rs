//! Socket plumbing underneath the framed channel.

use nix::sys::{
    socket::{self, MsgFlags, sockopt},
    time::{TimeVal, TimeValLike},
};
use std::{
    os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd},
    time::Duration,
};

pub mod bind;
pub mod client;
pub mod stream;

/// The operations the stream primitives need from a connected socket.
pub trait Transport {
    fn send(&mut self, buf: &[u8]) -> nix::Result<usize>;
    fn recv(&mut self, buf: &mut [u8], flags: MsgFlags) -> nix::Result<usize>;
    fn set_send_timeout(&mut self, timeout: Duration) -> nix::Result<()>;
    fn set_recv_timeout(&mut self, timeout: Duration) -> nix::Result<()>;
}

/// An exclusively owned stream socket. Dropping it closes the descriptor.
#[derive(Debug)]
pub struct SocketHandle {
    fd: OwnedFd,
}

impl From<OwnedFd> for SocketHandle {
    fn from(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

impl AsFd for SocketHandle {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl Transport for SocketHandle {
    fn send(&mut self, buf: &[u8]) -> nix::Result<usize> {
        // a closed peer must surface as EPIPE, not SIGPIPE
        socket::send(self.fd.as_raw_fd(), buf, MsgFlags::MSG_NOSIGNAL)
    }

    fn recv(&mut self, buf: &mut [u8], flags: MsgFlags) -> nix::Result<usize> {
        socket::recv(self.fd.as_raw_fd(), buf, flags)
    }

    fn set_send_timeout(&mut self, timeout: Duration) -> nix::Result<()> {
        socket::setsockopt(&self.fd, sockopt::SendTimeout, &timeval(timeout))
    }

    fn set_recv_timeout(&mut self, timeout: Duration) -> nix::Result<()> {
        socket::setsockopt(&self.fd, sockopt::ReceiveTimeout, &timeval(timeout))
    }
}

fn timeval(timeout: Duration) -> TimeVal {
    TimeVal::milliseconds(timeout.as_millis().min(i64::MAX as u128) as i64)
}
