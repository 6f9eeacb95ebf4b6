//! .

use kmre_client::{
    app::{MediaKind, PropKind, ProxyKind, Rotation},
    endpoint::DEFAULT_SOCKET_ROOT,
};
use std::path::PathBuf;

#[derive(clap::Parser)]
#[command(name = "kmre-ctl", about = "Talk to the kmre launcher and manager services")]
pub struct Cli {
    /// Directory holding the per-user socket directories.
    #[clap(global = true, long, default_value = DEFAULT_SOCKET_ROOT)]
    pub root: PathBuf,
    #[clap(global = true, long)]
    pub json: bool,
    #[clap(global = true, long, short)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

/// Where clipboard text comes from.
#[derive(clap::Args, Debug, Clone)]
pub struct InputSource {
    #[clap(long, conflicts_with_all = ["file", "stdin"])]
    pub text: Option<String>,

    #[clap(long, conflicts_with_all = ["text", "stdin"])]
    pub file: Option<PathBuf>,

    #[clap(long, conflicts_with_all = ["text", "file"])]
    pub stdin: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropArg {
    Prop,
    Setting,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaArg {
    All,
    Image,
    Video,
    Audio,
    Document,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationArg {
    Portrait,
    Landscape,
    Square,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyArg {
    Http,
    Https,
    Ftp,
    Socks,
}

impl From<PropArg> for PropKind {
    fn from(arg: PropArg) -> Self {
        match arg {
            PropArg::Prop => PropKind::Prop,
            PropArg::Setting => PropKind::Setting,
        }
    }
}

impl From<MediaArg> for MediaKind {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::All => MediaKind::All,
            MediaArg::Image => MediaKind::Image,
            MediaArg::Video => MediaKind::Video,
            MediaArg::Audio => MediaKind::Audio,
            MediaArg::Document => MediaKind::Document,
        }
    }
}

impl From<RotationArg> for Rotation {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Portrait => Rotation::Portrait,
            RotationArg::Landscape => Rotation::Landscape,
            RotationArg::Square => Rotation::Square,
        }
    }
}

impl From<ProxyArg> for ProxyKind {
    fn from(arg: ProxyArg) -> Self {
        match arg {
            ProxyArg::Http => ProxyKind::Http,
            ProxyArg::Https => ProxyKind::Https,
            ProxyArg::Ftp => ProxyKind::Ftp,
            ProxyArg::Socks => ProxyKind::Socks,
        }
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    InstallApp {
        /// Apk file name as the launcher knows it.
        #[clap(long)]
        file_name: String,

        #[clap(long)]
        app_name: String,

        #[clap(long)]
        package: String,
    },
    UninstallApp {
        #[clap(long)]
        package: String,
    },
    LaunchApp {
        #[clap(long)]
        package: String,

        #[clap(long)]
        fullscreen: bool,

        #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
        width: i32,

        #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
        height: i32,

        #[clap(long, default_value_t = 0, allow_negative_numbers = true)]
        density: i32,
    },
    CloseApp {
        #[clap(long)]
        app_name: String,

        #[clap(long)]
        package: String,
    },
    ListInstalled,
    ListRunning,
    Clipboard {
        #[clap(flatten)]
        input: InputSource,
    },
    Focus {
        #[clap(long)]
        display_id: i32,
    },
    ControlApp {
        #[clap(long)]
        display_id: i32,

        #[clap(long)]
        package: String,

        #[clap(long)]
        event_type: i32,

        #[clap(long, default_value_t = 0)]
        event_value: i32,
    },
    InsertFile {
        #[clap(long)]
        path: PathBuf,

        #[clap(long)]
        mime_type: String,
    },
    RemoveFile {
        #[clap(long)]
        path: PathBuf,

        #[clap(long)]
        mime_type: String,
    },
    MediaFiles {
        #[clap(long, value_enum, default_value = "all")]
        kind: MediaArg,
    },
    DragFile {
        #[clap(long)]
        path: PathBuf,

        #[clap(long)]
        package: String,

        #[clap(long)]
        display_id: i32,

        #[clap(long)]
        double_display: bool,
    },
    Rotation {
        #[clap(long)]
        display_id: i32,

        #[clap(long)]
        package: String,

        #[clap(long)]
        width: i32,

        #[clap(long)]
        height: i32,

        #[clap(long, value_enum)]
        rotation: RotationArg,
    },
    SetProp {
        #[clap(long, value_enum, default_value = "prop")]
        kind: PropArg,

        #[clap(long)]
        name: String,

        #[clap(long)]
        value: String,
    },
    GetProp {
        #[clap(long, value_enum, default_value = "prop")]
        kind: PropArg,

        #[clap(long)]
        name: String,
    },
    WindowSize {
        #[clap(long)]
        package: String,

        #[clap(long)]
        display_id: i32,

        #[clap(long)]
        width: i32,

        #[clap(long)]
        height: i32,
    },
    Proxy {
        /// Turn the proxy off instead of on.
        #[clap(long)]
        disable: bool,

        #[clap(long, value_enum, default_value = "http")]
        kind: ProxyArg,

        #[clap(long, default_value = "")]
        host: String,

        #[clap(long, default_value_t = 0)]
        port: u16,
    },
    DisplaySize {
        #[clap(long)]
        display_id: i32,

        #[clap(long)]
        width: i32,

        #[clap(long)]
        height: i32,
    },
    AnswerCall {
        #[clap(long)]
        reject: bool,
    },
    EnvInstalled,
    DebInstalled {
        #[clap(long)]
        name: String,
    },
}

/// A command with its inputs read and checked, ready to hand to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    InstallApp {
        file_name: String,
        app_name: String,
        package: String,
    },
    UninstallApp {
        package: String,
    },
    LaunchApp {
        package: String,
        fullscreen: bool,
        width: i32,
        height: i32,
        density: i32,
    },
    CloseApp {
        app_name: String,
        package: String,
    },
    ListInstalled,
    ListRunning,
    Clipboard(String),
    Focus(i32),
    ControlApp {
        display_id: i32,
        package: String,
        event_type: i32,
        event_value: i32,
    },
    InsertFile {
        path: String,
        mime_type: String,
    },
    RemoveFile {
        path: String,
        mime_type: String,
    },
    MediaFiles(MediaKind),
    DragFile {
        path: String,
        package: String,
        display_id: i32,
        double_display: bool,
    },
    Rotation {
        display_id: i32,
        package: String,
        width: i32,
        height: i32,
        rotation: Rotation,
    },
    SetProp {
        kind: PropKind,
        name: String,
        value: String,
    },
    GetProp {
        kind: PropKind,
        name: String,
    },
    WindowSize {
        package: String,
        display_id: i32,
        width: i32,
        height: i32,
    },
    Proxy {
        enable: bool,
        kind: ProxyKind,
        host: String,
        port: u16,
    },
    DisplaySize {
        display_id: i32,
        width: i32,
        height: i32,
    },
    AnswerCall(bool),
    EnvInstalled,
    DebInstalled(String),
}
