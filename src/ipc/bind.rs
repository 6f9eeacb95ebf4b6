//! .

use std::{
    fs, io,
    os::unix::net::{UnixListener, UnixStream},
    path::Path,
};

/// Bind a listener at `path`, creating its directory. A stale socket file left
/// behind by a dead listener is replaced; a live one is an `AddrInUse` error.
pub fn to(path: &Path) -> io::Result<UnixListener> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    if path.exists() {
        if UnixStream::connect(path).is_ok() {
            return Err(io::Error::new(
                io::ErrorKind::AddrInUse,
                format!("{} is already served", path.display()),
            ));
        }
        fs::remove_file(path)?;
    }
    UnixListener::bind(path)
}
