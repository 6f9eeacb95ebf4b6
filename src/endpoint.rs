//! Socket path resolution from the identity of the calling process.
//!
//! Every user gets a private directory under the socket root:
//!
//! ```text
//! /var/lib/kmre/kmre-<uid>-<user>/sockets/{kmre_launcher,kmre_manager}
//! ```

use nix::unistd::{Uid, User, getuid};
use serde::Serialize;
use std::{
    env,
    fmt::{self, Display},
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_SOCKET_ROOT: &str = "/var/lib/kmre";

/// Environment variables consulted, in order, when the user database has no
/// entry for the current uid.
const USER_NAME_VARS: [&str; 2] = ["USER", "USERNAME"];

/// The two services a channel can talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Launcher,
    Manager,
}

impl Endpoint {
    pub fn socket_name(self) -> &'static str {
        match self {
            Endpoint::Launcher => "kmre_launcher",
            Endpoint::Manager => "kmre_manager",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.socket_name())
    }
}

/// Who the socket directory belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub uid: u32,
    pub name: String,
}

impl Identity {
    /// Identity of the running process. Never fails: without a user database
    /// entry or environment hint the uid doubles as the name.
    pub fn current() -> Self {
        Self::resolve(getuid().as_raw(), lookup_login_name, |var| env::var(var).ok())
    }

    /// Resolve the name for `uid` through `lookup`, then the environment, then the uid itself.
    pub fn resolve(
        uid: u32,
        lookup: impl FnOnce(u32) -> Option<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let name = lookup(uid)
            .or_else(|| {
                warn!("no user database entry for uid {uid}, falling back to environment");
                USER_NAME_VARS
                    .into_iter()
                    .filter_map(|var| env(var))
                    .find(|name| !name.is_empty())
            })
            .unwrap_or_else(|| uid.to_string());
        Self { uid, name }
    }

    /// Per-user directory name, `kmre-<uid>-<sanitized name>`.
    pub fn dir_name(&self) -> String {
        format!("kmre-{}-{}", self.uid, sanitize_user_name(&self.name))
    }
}

/// Domain logins such as `DOMAIN\user` cannot appear in a path component.
pub fn sanitize_user_name(name: &str) -> String {
    name.replace('\\', "_")
}

fn lookup_login_name(uid: u32) -> Option<String> {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(Some(user)) if !user.name.is_empty() => Some(user.name),
        Ok(_) => None,
        Err(e) => {
            warn!("getpwuid_r({uid}) failed: {e}");
            None
        }
    }
}

/// Directory under which the per-user socket directories live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocketRoot(PathBuf);

impl Default for SocketRoot {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_SOCKET_ROOT))
    }
}

impl SocketRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Socket path of `endpoint` for the current process. Recomputed on every call.
    pub fn resolve(&self, endpoint: Endpoint) -> PathBuf {
        self.path_for(&Identity::current(), endpoint)
    }

    pub fn path_for(&self, identity: &Identity, endpoint: Endpoint) -> PathBuf {
        self.0
            .join(identity.dir_name())
            .join("sockets")
            .join(endpoint.socket_name())
    }
}

/// Socket path of `endpoint` under the default root.
pub fn resolve_endpoint(endpoint: Endpoint) -> PathBuf {
    SocketRoot::default().resolve(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn database_name_wins() {
        let id = Identity::resolve(1000, |_| Some("kylin".into()), env_of(&[("USER", "other")]));
        assert_eq!(id.name, "kylin");
    }

    #[test]
    fn falls_back_to_user_var() {
        let id = Identity::resolve(
            1000,
            |_| None,
            env_of(&[("USER", "from_user"), ("USERNAME", "from_username")]),
        );
        assert_eq!(id.name, "from_user");
    }

    #[test]
    fn falls_back_to_username_var() {
        let id = Identity::resolve(1000, |_| None, env_of(&[("USERNAME", "from_username")]));
        assert_eq!(id.name, "from_username");
    }

    #[test]
    fn empty_user_var_is_skipped() {
        let id = Identity::resolve(
            1000,
            |_| None,
            env_of(&[("USER", ""), ("USERNAME", "from_username")]),
        );
        assert_eq!(id.name, "from_username");
    }

    #[test]
    fn falls_back_to_uid() {
        let id = Identity::resolve(4242, |_| None, env_of(&[]));
        assert_eq!(id.name, "4242");

        let path = SocketRoot::default().path_for(&id, Endpoint::Manager);
        assert_eq!(
            path,
            Path::new("/var/lib/kmre/kmre-4242-4242/sockets/kmre_manager")
        );
    }

    #[test]
    fn backslashes_become_underscores() {
        let id = Identity::resolve(1001, |_| Some(r"DOMAIN\user".into()), env_of(&[]));
        let path = SocketRoot::default().path_for(&id, Endpoint::Launcher);
        assert_eq!(
            path,
            Path::new("/var/lib/kmre/kmre-1001-DOMAIN_user/sockets/kmre_launcher")
        );
    }

    #[test]
    fn sanitize_replaces_every_backslash() {
        assert_eq!(sanitize_user_name(r"A\B\\c"), "A_B__c");
        assert_eq!(sanitize_user_name("plain"), "plain");
    }

    #[test]
    fn custom_root() {
        let id = Identity {
            uid: 7,
            name: "u".into(),
        };
        let root = SocketRoot::new("/run/test");
        assert_eq!(
            root.path_for(&id, Endpoint::Launcher),
            Path::new("/run/test/kmre-7-u/sockets/kmre_launcher")
        );
    }

    #[test]
    fn current_identity_resolves_to_a_path() {
        let path = resolve_endpoint(Endpoint::Launcher);
        let id = Identity::current();
        assert!(!id.name.is_empty());
        assert!(path.starts_with(DEFAULT_SOCKET_ROOT));
        assert!(path.ends_with("sockets/kmre_launcher"));
    }
}
