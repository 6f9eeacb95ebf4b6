//! .

use crate::cli::{
    error::{ParseError as Error, ParseResult as Result},
    models::{Action, Command, InputSource},
};

use std::{
    fs,
    path::{self, Path},
};

pub(crate) fn parse_cmd(cmd: &Command) -> Result<Action> {
    match cmd {
        Command::InstallApp {
            file_name,
            app_name,
            package,
        } => Ok(Action::InstallApp {
            file_name: file_name.clone(),
            app_name: app_name.clone(),
            package: package.clone(),
        }),
        Command::UninstallApp { package } => Ok(Action::UninstallApp {
            package: package.clone(),
        }),
        Command::LaunchApp {
            package,
            fullscreen,
            width,
            height,
            density,
        } => Ok(Action::LaunchApp {
            package: package.clone(),
            fullscreen: *fullscreen,
            width: *width,
            height: *height,
            density: *density,
        }),
        Command::CloseApp { app_name, package } => Ok(Action::CloseApp {
            app_name: app_name.clone(),
            package: package.clone(),
        }),
        Command::ListInstalled => Ok(Action::ListInstalled),
        Command::ListRunning => Ok(Action::ListRunning),
        Command::Clipboard { input } => Ok(Action::Clipboard(resolve_text(input)?)),
        Command::Focus { display_id } => Ok(Action::Focus(*display_id)),
        Command::ControlApp {
            display_id,
            package,
            event_type,
            event_value,
        } => Ok(Action::ControlApp {
            display_id: *display_id,
            package: package.clone(),
            event_type: *event_type,
            event_value: *event_value,
        }),
        Command::InsertFile { path, mime_type } => Ok(Action::InsertFile {
            path: resolve_path(path)?,
            mime_type: mime_type.clone(),
        }),
        Command::RemoveFile { path, mime_type } => Ok(Action::RemoveFile {
            path: resolve_path(path)?,
            mime_type: mime_type.clone(),
        }),
        Command::MediaFiles { kind } => Ok(Action::MediaFiles((*kind).into())),
        Command::DragFile {
            path,
            package,
            display_id,
            double_display,
        } => Ok(Action::DragFile {
            path: resolve_path(path)?,
            package: package.clone(),
            display_id: *display_id,
            double_display: *double_display,
        }),
        Command::Rotation {
            display_id,
            package,
            width,
            height,
            rotation,
        } => Ok(Action::Rotation {
            display_id: *display_id,
            package: package.clone(),
            width: *width,
            height: *height,
            rotation: (*rotation).into(),
        }),
        Command::SetProp { kind, name, value } => Ok(Action::SetProp {
            kind: (*kind).into(),
            name: name.clone(),
            value: value.clone(),
        }),
        Command::GetProp { kind, name } => Ok(Action::GetProp {
            kind: (*kind).into(),
            name: name.clone(),
        }),
        Command::WindowSize {
            package,
            display_id,
            width,
            height,
        } => Ok(Action::WindowSize {
            package: package.clone(),
            display_id: *display_id,
            width: *width,
            height: *height,
        }),
        Command::Proxy {
            disable,
            kind,
            host,
            port,
        } => Ok(Action::Proxy {
            enable: !disable,
            kind: (*kind).into(),
            host: host.clone(),
            port: *port,
        }),
        Command::DisplaySize {
            display_id,
            width,
            height,
        } => Ok(Action::DisplaySize {
            display_id: *display_id,
            width: *width,
            height: *height,
        }),
        Command::AnswerCall { reject } => Ok(Action::AnswerCall(!reject)),
        Command::EnvInstalled => Ok(Action::EnvInstalled),
        Command::DebInstalled { name } => Ok(Action::DebInstalled(name.clone())),
    }
}

fn resolve_text(input: &InputSource) -> Result<String> {
    let bytes = match (&input.text, &input.file, input.stdin) {
        (Some(text), None, false) => return Ok(text.clone()),
        (None, Some(path), false) => fs::read(path).map_err(Error::CouldNotReadPath)?,
        (None, None, true) => {
            use std::io::Read;
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| Error::StdIn(format!("Failed to read stdin: {e}")))?;
            buf
        }
        _ => {
            return Err(Error::InvalidInputSource(
                "Invalid input source; exactly one must be set".into(),
            ));
        }
    };
    String::from_utf8(bytes).map_err(|_| Error::NonUtf8Input)
}

/// The services resolve paths in their own working directory, so relative
/// paths are made absolute here. The file itself need not exist.
fn resolve_path(path: &Path) -> Result<String> {
    let absolute = path::absolute(path).map_err(Error::CouldNotReadPath)?;
    absolute.into_os_string().into_string().map_err(|raw| Error::NonUtf8Path(raw.into()))
}
