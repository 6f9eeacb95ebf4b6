//! .

use kmre_client::{
    Client, ClientResult,
    app::UninstallOutcome,
    host,
    messages::{InstalledAppItem, RunningAppItem},
};
use serde::Serialize;

use crate::cli::models::Action;

/// What an action produced, in a shape both renderers understand.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Accepted { result: bool },
    Uninstalled { outcome: UninstallOutcome, code: i32 },
    Installed { apps: Vec<InstalledAppItem> },
    Running { apps: Vec<RunningAppItem> },
    Sent,
    Prop { value: Option<String> },
    Check { installed: bool },
    Failed { error: String },
}

pub(crate) fn execute(client: &Client, action: Action) -> Outcome {
    match action {
        Action::InstallApp {
            file_name,
            app_name,
            package,
        } => accepted(client.install_app(&file_name, &app_name, &package)),
        Action::UninstallApp { package } => {
            let outcome = client.uninstall_app(&package);
            Outcome::Uninstalled {
                outcome,
                code: outcome.code(),
            }
        }
        Action::LaunchApp {
            package,
            fullscreen,
            width,
            height,
            density,
        } => accepted(client.launch_app(&package, fullscreen, width, height, density)),
        Action::CloseApp { app_name, package } => accepted(client.close_app(&app_name, &package)),
        Action::ListInstalled => match client.installed_apps() {
            Ok(apps) => Outcome::Installed { apps },
            Err(e) => failed(e),
        },
        Action::ListRunning => match client.running_apps() {
            Ok(apps) => Outcome::Running { apps },
            Err(e) => failed(e),
        },
        Action::Clipboard(text) => sent(client.send_clipboard(&text)),
        Action::Focus(display_id) => sent(client.focus_window(display_id)),
        Action::ControlApp {
            display_id,
            package,
            event_type,
            event_value,
        } => sent(client.control_app(display_id, &package, event_type, event_value)),
        Action::InsertFile { path, mime_type } => sent(client.insert_file(&path, &mime_type)),
        Action::RemoveFile { path, mime_type } => sent(client.remove_file(&path, &mime_type)),
        Action::MediaFiles(kind) => sent(client.request_media_files(kind)),
        Action::DragFile {
            path,
            package,
            display_id,
            double_display,
        } => sent(client.drag_file(&path, &package, display_id, double_display)),
        Action::Rotation {
            display_id,
            package,
            width,
            height,
            rotation,
        } => sent(client.rotation_changed(display_id, &package, width, height, rotation)),
        Action::SetProp { kind, name, value } => sent(client.set_system_prop(kind, &name, &value)),
        Action::GetProp { kind, name } => match client.system_prop(kind, &name) {
            Ok(value) => Outcome::Prop { value },
            Err(e) => failed(e),
        },
        Action::WindowSize {
            package,
            display_id,
            width,
            height,
        } => sent(client.update_app_window_size(&package, display_id, width, height)),
        Action::Proxy {
            enable,
            kind,
            host,
            port,
        } => sent(client.update_network_proxy(enable, kind, &host, port)),
        Action::DisplaySize {
            display_id,
            width,
            height,
        } => sent(client.update_display_size(display_id, width, height)),
        Action::AnswerCall(answer) => sent(client.answer_call(answer)),
        Action::EnvInstalled => Outcome::Check {
            installed: host::is_android_env_installed(),
        },
        Action::DebInstalled(name) => Outcome::Check {
            installed: host::is_deb_package_installed(&name),
        },
    }
}

fn accepted(res: ClientResult<bool>) -> Outcome {
    match res {
        Ok(result) => Outcome::Accepted { result },
        Err(e) => failed(e),
    }
}

fn sent(res: ClientResult<()>) -> Outcome {
    match res {
        Ok(()) => Outcome::Sent,
        Err(e) => failed(e),
    }
}

fn failed(e: impl std::fmt::Display) -> Outcome {
    Outcome::Failed {
        error: e.to_string(),
    }
}
