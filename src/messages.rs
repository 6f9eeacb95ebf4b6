//! Request and reply schemas exchanged with the launcher and manager services.

use serde::{Deserialize, Serialize};

use crate::protocol::{Command, Message, NoReply, ReplySchema};

/// Bind each request schema to its command and reply schema. The reply column
/// must agree with `Command::expects_reply`, checked at compile time.
macro_rules! bind_commands {
    ($($msg:ident => $reply:ty),+ $(,)?) => {
        $(
            impl Message for $msg {
                const COMMAND: Command = Command::$msg;
                type Reply = $reply;
            }

            const _: () = assert!(
                Command::$msg.expects_reply() == <$reply as ReplySchema>::EXPECTED
            );
        )+

        #[cfg(test)]
        const BINDINGS: &[(Command, bool)] = &[
            $((Command::$msg, <$reply as ReplySchema>::EXPECTED)),+
        ];
    };
}

macro_rules! reply_schemas {
    ($($reply:ident),+ $(,)?) => {
        $(impl ReplySchema for $reply {
            const EXPECTED: bool = true;
        })+
    };
}

bind_commands!(
    InstallApp => ActionResult,
    UninstallApp => ActionResult,
    LaunchApp => ActionResult,
    CloseApp => ActionResult,
    GetInstalledAppList => InstalledAppList,
    GetRunningAppList => RunningAppList,
    SetClipboard => NoReply,
    FocusWin => NoReply,
    ControlApp => NoReply,
    InsertFile => NoReply,
    RemoveFile => NoReply,
    RequestMediaFiles => NoReply,
    DragFile => NoReply,
    RotationChanged => NoReply,
    SetSystemProp => NoReply,
    GetSystemProp => SendSystemProp,
    UpdateAppWindowSize => NoReply,
    SetProxy => NoReply,
    UpdateDisplaySize => NoReply,
    AnswerCall => NoReply,
);

reply_schemas!(ActionResult, InstalledAppList, RunningAppList, SendSystemProp);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstallApp {
    /// Apk file name, e.g. `com.tencent.mm_8.0.0.apk`
    pub file_name: String,
    pub app_name: String,
    pub package_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UninstallApp {
    pub package_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LaunchApp {
    pub package_name: String,
    pub fullscreen: bool,
    pub width: i32,
    pub height: i32,
    pub density: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CloseApp {
    pub app_name: String,
    pub package_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetInstalledAppList {
    pub include_hide_app: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetRunningAppList {
    pub with_thumbnail: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetClipboard {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FocusWin {
    /// Display id of the window to raise.
    pub focus_win: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ControlApp {
    pub display_id: i32,
    pub package_name: String,
    /// 0 back, 1 camera, 2/3 volume up/down, 4/5 brightness up/down
    pub event_type: i32,
    pub event_value: Option<i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InsertFile {
    /// Absolute path of the file on the desktop side.
    pub data: String,
    pub mime_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoveFile {
    pub data: String,
    pub mime_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RequestMediaFiles {
    #[serde(rename = "type")]
    pub kind: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DragFile {
    pub file_path: String,
    pub package_name: String,
    pub display_id: i32,
    pub has_double_display: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RotationChanged {
    pub display_id: i32,
    pub package_name: String,
    pub width: i32,
    pub height: i32,
    pub rotation: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetSystemProp {
    pub event_type: i32,
    pub value_field: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GetSystemProp {
    pub event_type: i32,
    pub value_field: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateAppWindowSize {
    pub package_name: String,
    pub display_id: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SetProxy {
    pub open: bool,
    pub host: String,
    pub port: i32,
    /// http, https, ftp or socks
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateDisplaySize {
    pub display_id: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnswerCall {
    pub answer: bool,
}

/// Generic acknowledgement for app lifecycle commands.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionResult {
    pub result: bool,
    /// Outcome code reported by the package manager, e.g. `DELETE_SUCCEEDED`.
    pub org_cmd: String,
    pub err_info: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InstalledAppItem {
    pub app_name: String,
    pub package_name: String,
    pub version_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledAppList {
    pub size: i32,
    pub item: Vec<InstalledAppItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RunningAppItem {
    pub app_name: String,
    pub package_name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningAppList {
    pub size: i32,
    pub item: Vec<RunningAppItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SendSystemProp {
    pub event_type: i32,
    pub value_field: String,
    pub value: String,
}
