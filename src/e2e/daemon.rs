//! Stand-in for the launcher and manager services.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tempfile::{TempDir, tempdir};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    select,
    time::timeout,
};
use tokio_util::sync::CancellationToken;

use crate::{
    Client,
    endpoint::{Endpoint, SocketRoot},
    ipc::bind,
    protocol::{CommandTag, split_frame},
};

/// Silence after which a request frame is considered complete.
const IDLE_GAP: Duration = Duration::from_millis(100);

type Responder = dyn Fn(CommandTag, &[u8]) -> Option<Vec<u8>> + Send + Sync;

/// One accepted connection as the stub saw it.
#[derive(Clone, Debug)]
pub(super) struct Received {
    pub endpoint: Endpoint,
    pub frame: Vec<u8>,
    /// The client shut the connection without waiting for a reply.
    pub peer_closed: bool,
}

impl Received {
    pub fn tag(&self) -> Option<CommandTag> {
        split_frame(&self.frame).map(|(tag, _)| tag)
    }

    pub fn body(&self) -> &[u8] {
        split_frame(&self.frame).map_or(&[], |(_, body)| body)
    }
}

pub(super) struct StubDaemon {
    root: TempDir,
    received: Arc<Mutex<Vec<Received>>>,
    loop_ctrl: CancellationToken,
}

impl StubDaemon {
    /// Serve both endpoints under a fresh socket root. `respond` maps a request
    /// to the bytes written back, or `None` to write nothing.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(CommandTag, &[u8]) -> Option<Vec<u8>> + Send + Sync + 'static,
    {
        super::init_tracing();
        let root = tempdir().unwrap();
        let socket_root = SocketRoot::new(root.path());
        let received = Arc::new(Mutex::new(Vec::new()));
        let loop_ctrl = CancellationToken::new();
        let respond: Arc<Responder> = Arc::new(respond);

        for endpoint in [Endpoint::Launcher, Endpoint::Manager] {
            let listener = bind::to(&socket_root.resolve(endpoint)).unwrap();
            listener.set_nonblocking(true).unwrap();
            let listener = UnixListener::from_std(listener).unwrap();
            tokio::spawn(run(
                listener,
                endpoint,
                respond.clone(),
                received.clone(),
                loop_ctrl.clone(),
            ));
        }

        Self {
            root,
            received,
            loop_ctrl,
        }
    }

    pub fn socket_root(&self) -> SocketRoot {
        SocketRoot::new(self.root.path())
    }

    /// A client pointed at this stub, with the stub's directory as home.
    pub fn client(&self) -> Client {
        Client::new(self.socket_root()).with_home(self.root.path())
    }

    pub fn home(&self) -> &std::path::Path {
        self.root.path()
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    /// Wait until `n` connections have been recorded. Fire-and-forget clients
    /// return before the stub has seen them hang up.
    pub async fn wait_received(&self, n: usize) -> Vec<Received> {
        for _ in 0..500 {
            let received = self.received();
            if received.len() >= n {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("stub saw {} connections, expected {n}", self.received().len());
    }
}

impl Drop for StubDaemon {
    fn drop(&mut self) {
        self.loop_ctrl.cancel();
    }
}

async fn run(
    listener: UnixListener,
    endpoint: Endpoint,
    respond: Arc<Responder>,
    received: Arc<Mutex<Vec<Received>>>,
    loop_ctrl: CancellationToken,
) {
    loop {
        let res = select! {
            res = listener.accept() => res,
            _ = loop_ctrl.cancelled() => {
                break;
            }
        };

        match res {
            Ok((stream, _)) => {
                let respond = respond.clone();
                let received = received.clone();
                tokio::spawn(async move {
                    handle_conn(stream, endpoint, respond, received).await;
                });
            }
            Err(e) => {
                eprintln!("Accept error: {e}");
            }
        }
    }
}

async fn handle_conn(
    mut stream: UnixStream,
    endpoint: Endpoint,
    respond: Arc<Responder>,
    received: Arc<Mutex<Vec<Received>>>,
) {
    let mut frame = Vec::new();
    let mut buf = [0u8; 4096];
    let mut peer_closed = false;
    loop {
        let wait = if frame.is_empty() {
            Duration::from_secs(5)
        } else {
            IDLE_GAP
        };
        match timeout(wait, stream.read(&mut buf)).await {
            Ok(Ok(0)) => {
                peer_closed = true;
                break;
            }
            Ok(Ok(n)) => frame.extend_from_slice(&buf[..n]),
            Ok(Err(_)) | Err(_) => break,
        }
    }

    let reply = split_frame(&frame).and_then(|(tag, body)| respond(tag, body));
    received.lock().unwrap().push(Received {
        endpoint,
        frame,
        peer_closed,
    });

    if let (Some(reply), false) = (reply, peer_closed) {
        let _ = stream.write_all(&reply).await;
    }
}
