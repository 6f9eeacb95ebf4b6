//! Entry points used by desktop components. Each one is a single exchange on a
//! fresh channel that is closed before returning.

use serde::{Serialize, de::DeserializeOwned};
use std::path::PathBuf;
use tracing::{debug, error, warn};

use crate::{
    channel::{Channel, Timeouts},
    endpoint::SocketRoot,
    error::ClientResult as Result,
    host,
    messages::*,
    protocol::{Message, NoReply},
};

/// Which property store a system property lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    Prop = 0,
    Setting = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    All = 0,
    Image = 1,
    Video = 2,
    Audio = 3,
    Document = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    Portrait = 0,
    Landscape = 1,
    Square = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyKind {
    Http,
    Https,
    Ftp,
    Socks,
}

impl ProxyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyKind::Http => "http",
            ProxyKind::Https => "https",
            ProxyKind::Ftp => "ftp",
            ProxyKind::Socks => "socks",
        }
    }
}

/// How an uninstall request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UninstallOutcome {
    Removed,
    InternalError,
    DevicePolicyManager,
    UserRestricted,
    OwnerBlocked,
    Aborted,
    UsedSharedLibrary,
    ReplyLost,
    NotSent,
}

impl UninstallOutcome {
    /// Numeric status used by callers of the C interface.
    pub fn code(self) -> i32 {
        match self {
            UninstallOutcome::Removed => 1,
            UninstallOutcome::InternalError => -1,
            UninstallOutcome::DevicePolicyManager => -2,
            UninstallOutcome::UserRestricted => -3,
            UninstallOutcome::OwnerBlocked => -4,
            UninstallOutcome::Aborted => -5,
            UninstallOutcome::UsedSharedLibrary => -6,
            UninstallOutcome::ReplyLost => -7,
            UninstallOutcome::NotSent => -8,
        }
    }

    fn from_reply(reply: &ActionResult) -> Self {
        if reply.result {
            return UninstallOutcome::Removed;
        }
        match reply.org_cmd.as_str() {
            "DELETE_SUCCEEDED" => UninstallOutcome::Removed,
            "DELETE_FAILED_DEVICE_POLICY_MANAGER" => UninstallOutcome::DevicePolicyManager,
            "DELETE_FAILED_USER_RESTRICTED" => UninstallOutcome::UserRestricted,
            "DELETE_FAILED_OWNER_BLOCKED" => UninstallOutcome::OwnerBlocked,
            "DELETE_FAILED_ABORTED" => UninstallOutcome::Aborted,
            "DELETE_FAILED_USED_SHARED_LIBRARY" => UninstallOutcome::UsedSharedLibrary,
            _ => UninstallOutcome::InternalError,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    root: SocketRoot,
    home: Option<PathBuf>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(SocketRoot::default())
    }
}

impl Client {
    pub fn new(root: SocketRoot) -> Self {
        Self {
            root,
            home: dirs::home_dir(),
        }
    }

    /// Home directory whose desktop entries are cleaned up after an uninstall.
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn root(&self) -> &SocketRoot {
        &self.root
    }

    /// Send `msg` and wait for the reply its command is answered with.
    /// Fire-and-forget commands have no reply to wait for:
    ///
    /// ```compile_fail
    /// use kmre_client::{Client, messages::SetClipboard};
    ///
    /// let msg = SetClipboard { content: "x".into() };
    /// Client::default().request(&msg, None).unwrap();
    /// ```
    pub fn request<Req>(&self, msg: &Req, timeouts: Option<Timeouts>) -> Result<Req::Reply>
    where
        Req: Message,
        Req::Reply: DeserializeOwned,
    {
        let mut channel = self.connect::<Req>(timeouts)?;
        channel.send(msg)?;
        channel.receive()
    }

    /// Send `msg` without waiting for anything back. Only commands the
    /// services never answer are accepted:
    ///
    /// ```compile_fail
    /// use kmre_client::{Client, messages::InstallApp};
    ///
    /// let msg = InstallApp {
    ///     file_name: "a.apk".into(),
    ///     app_name: "A".into(),
    ///     package_name: "com.a".into(),
    /// };
    /// Client::default().notify(&msg).unwrap();
    /// ```
    pub fn notify<Req: Message<Reply = NoReply>>(&self, msg: &Req) -> Result<()> {
        let mut channel = self.connect::<Req>(None)?;
        channel.send(msg)
    }

    fn connect<Req: Message>(&self, timeouts: Option<Timeouts>) -> Result<Channel<Req>> {
        let mut channel = Channel::open_in(&self.root, Req::COMMAND.endpoint());
        channel.connect()?;
        if let Some(timeouts) = timeouts {
            if let Err(e) = channel.configure_timeout(timeouts) {
                warn!("{e}, continuing without timeouts");
            }
        }
        Ok(channel)
    }

    pub fn install_app(&self, file_name: &str, app_name: &str, package_name: &str) -> Result<bool> {
        let msg = InstallApp {
            file_name: file_name.into(),
            app_name: app_name.into(),
            package_name: package_name.into(),
        };
        let reply: ActionResult = logged("install_app", self.request(&msg, None))?;
        Ok(reply.result)
    }

    pub fn uninstall_app(&self, package_name: &str) -> UninstallOutcome {
        let msg = UninstallApp {
            package_name: package_name.into(),
        };
        let reply: ActionResult = match self.request(&msg, None) {
            Ok(reply) => reply,
            Err(e) if e.before_send() => {
                error!("uninstall_app: {e}");
                return UninstallOutcome::NotSent;
            }
            Err(e) => {
                error!("uninstall_app: {e}");
                return UninstallOutcome::ReplyLost;
            }
        };
        debug!(
            "uninstall reply: result = {}, org_cmd = '{}', err_info = '{}'",
            reply.result,
            reply.org_cmd,
            reply.err_info.as_deref().unwrap_or_default()
        );

        let outcome = UninstallOutcome::from_reply(&reply);
        if outcome == UninstallOutcome::Removed {
            if let Some(home) = &self.home {
                host::remove_desktop_entry(home, package_name);
            }
        }
        outcome
    }

    /// Non-positive sizes let the service pick; density defaults to 240.
    pub fn launch_app(
        &self,
        package_name: &str,
        fullscreen: bool,
        width: i32,
        height: i32,
        density: i32,
    ) -> Result<bool> {
        let msg = LaunchApp {
            package_name: package_name.into(),
            fullscreen,
            width: width.max(0),
            height: height.max(0),
            density: if density > 0 { density } else { 240 },
        };
        let reply: ActionResult = logged("launch_app", self.request(&msg, None))?;
        Ok(reply.result)
    }

    pub fn close_app(&self, app_name: &str, package_name: &str) -> Result<bool> {
        let msg = CloseApp {
            app_name: app_name.into(),
            package_name: package_name.into(),
        };
        let reply: ActionResult = logged("close_app", self.request(&msg, None))?;
        Ok(reply.result)
    }

    pub fn installed_apps(&self) -> Result<Vec<InstalledAppItem>> {
        let msg = GetInstalledAppList {
            include_hide_app: true,
        };
        let list: InstalledAppList = logged("installed_apps", self.request(&msg, None))?;
        Ok(list.item)
    }

    pub fn running_apps(&self) -> Result<Vec<RunningAppItem>> {
        let msg = GetRunningAppList {
            with_thumbnail: true,
        };
        let list: RunningAppList = logged("running_apps", self.request(&msg, None))?;
        Ok(list.item)
    }

    pub fn send_clipboard(&self, content: &str) -> Result<()> {
        let msg = SetClipboard {
            content: content.into(),
        };
        logged("send_clipboard", self.notify(&msg))
    }

    pub fn focus_window(&self, display_id: i32) -> Result<()> {
        let msg = FocusWin {
            focus_win: display_id,
        };
        logged("focus_window", self.notify(&msg))
    }

    /// `event_value` is only sent when positive.
    pub fn control_app(
        &self,
        display_id: i32,
        package_name: &str,
        event_type: i32,
        event_value: i32,
    ) -> Result<()> {
        let msg = ControlApp {
            display_id,
            package_name: package_name.into(),
            event_type,
            event_value: (event_value > 0).then_some(event_value),
        };
        logged("control_app", self.notify(&msg))
    }

    pub fn insert_file(&self, path: &str, mime_type: &str) -> Result<()> {
        let msg = InsertFile {
            data: path.into(),
            mime_type: mime_type.into(),
        };
        logged("insert_file", self.notify(&msg))
    }

    pub fn remove_file(&self, path: &str, mime_type: &str) -> Result<()> {
        let msg = RemoveFile {
            data: path.into(),
            mime_type: mime_type.into(),
        };
        logged("remove_file", self.notify(&msg))
    }

    pub fn request_media_files(&self, kind: MediaKind) -> Result<()> {
        let msg = RequestMediaFiles { kind: kind as i32 };
        logged("request_media_files", self.notify(&msg))
    }

    pub fn drag_file(
        &self,
        path: &str,
        package_name: &str,
        display_id: i32,
        has_double_display: bool,
    ) -> Result<()> {
        let msg = DragFile {
            file_path: path.into(),
            package_name: package_name.into(),
            display_id,
            has_double_display,
        };
        logged("drag_file", self.notify(&msg))
    }

    pub fn rotation_changed(
        &self,
        display_id: i32,
        package_name: &str,
        width: i32,
        height: i32,
        rotation: Rotation,
    ) -> Result<()> {
        let msg = RotationChanged {
            display_id,
            package_name: package_name.into(),
            width,
            height,
            rotation: rotation as i32,
        };
        logged("rotation_changed", self.notify(&msg))
    }

    pub fn set_system_prop(&self, kind: PropKind, name: &str, value: &str) -> Result<()> {
        let msg = SetSystemProp {
            event_type: kind as i32,
            value_field: name.into(),
            value: value.into(),
        };
        logged("set_system_prop", self.notify(&msg))
    }

    /// Read a property. A reply describing a different property yields `None`.
    pub fn system_prop(&self, kind: PropKind, name: &str) -> Result<Option<String>> {
        let msg = GetSystemProp {
            event_type: kind as i32,
            value_field: name.into(),
        };
        let reply: SendSystemProp =
            logged("system_prop", self.request(&msg, Some(Timeouts::default())))?;
        if reply.event_type != msg.event_type || reply.value_field != msg.value_field {
            warn!(
                "asked for {}:{}, service answered {}:{}",
                msg.event_type, msg.value_field, reply.event_type, reply.value_field
            );
            return Ok(None);
        }
        Ok(Some(reply.value))
    }

    pub fn update_app_window_size(
        &self,
        package_name: &str,
        display_id: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        let msg = UpdateAppWindowSize {
            package_name: package_name.into(),
            display_id,
            width,
            height,
        };
        logged("update_app_window_size", self.notify(&msg))
    }

    pub fn update_network_proxy(
        &self,
        enable: bool,
        kind: ProxyKind,
        host: &str,
        port: u16,
    ) -> Result<()> {
        let msg = SetProxy {
            open: enable,
            host: host.into(),
            port: i32::from(port),
            kind: kind.as_str().into(),
        };
        logged("update_network_proxy", self.notify(&msg))
    }

    pub fn update_display_size(&self, display_id: i32, width: i32, height: i32) -> Result<()> {
        let msg = UpdateDisplaySize {
            display_id,
            width,
            height,
        };
        logged("update_display_size", self.notify(&msg))
    }

    pub fn answer_call(&self, answer: bool) -> Result<()> {
        logged("answer_call", self.notify(&AnswerCall { answer }))
    }
}

fn logged<T>(op: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        error!("{op}: {e}");
    }
    result
}
