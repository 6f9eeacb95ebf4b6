//! This module defines the framing between a desktop client and the kmre services.
//!
//! A request frame is a 4-byte command tag followed by the msgpack-encoded
//! message. A reply is the bare encoded message; it carries no tag and no
//! length, and ends where the service stops sending.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{self, Display};

use crate::{
    endpoint::Endpoint,
    error::{ClientError as Error, ClientResult as Result},
};

pub const HEADER_LEN: usize = 4;

/// A command index in `0..=9999`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandTag(u16);

impl CommandTag {
    pub const MAX: u16 = 9999;

    pub fn new(index: u16) -> Result<Self> {
        if index > Self::MAX {
            return Err(Error::TagOutOfRange(index));
        }
        Ok(Self(index))
    }

    pub fn index(self) -> u16 {
        self.0
    }

    pub fn header(self) -> FrameHeader {
        FrameHeader::encode(self.0)
    }
}

impl Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// The decimal digits of a command index, one digit value (not ASCII) per byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader([u8; HEADER_LEN]);

impl FrameHeader {
    /// Indices above 9999 keep only their last four digits.
    pub fn encode(index: u16) -> Self {
        Self([
            (index / 1000 % 10) as u8,
            (index / 100 % 10) as u8,
            (index / 10 % 10) as u8,
            (index % 10) as u8,
        ])
    }

    /// `None` when any byte is not a digit value.
    pub fn from_bytes(bytes: [u8; HEADER_LEN]) -> Option<Self> {
        bytes.iter().all(|b| *b < 10).then_some(Self(bytes))
    }

    pub fn decode(self) -> u16 {
        let [b0, b1, b2, b3] = self.0.map(u16::from);
        1000 * b0 + 100 * b1 + 10 * b2 + b3
    }

    pub fn tag(self) -> CommandTag {
        CommandTag(self.decode())
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_LEN] {
        &self.0
    }
}

/// Every message kind the services understand, keyed by its wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    InstallApp = 1,
    UninstallApp = 2,
    LaunchApp = 3,
    CloseApp = 4,
    GetInstalledAppList = 5,
    GetRunningAppList = 6,
    SetClipboard = 7,
    FocusWin = 8,
    ControlApp = 9,
    InsertFile = 10,
    RemoveFile = 11,
    RequestMediaFiles = 12,
    DragFile = 13,
    RotationChanged = 14,
    SetSystemProp = 15,
    GetSystemProp = 16,
    UpdateAppWindowSize = 17,
    SetProxy = 18,
    UpdateDisplaySize = 19,
    AnswerCall = 20,
}

impl Command {
    pub const ALL: [Command; 20] = [
        Command::InstallApp,
        Command::UninstallApp,
        Command::LaunchApp,
        Command::CloseApp,
        Command::GetInstalledAppList,
        Command::GetRunningAppList,
        Command::SetClipboard,
        Command::FocusWin,
        Command::ControlApp,
        Command::InsertFile,
        Command::RemoveFile,
        Command::RequestMediaFiles,
        Command::DragFile,
        Command::RotationChanged,
        Command::SetSystemProp,
        Command::GetSystemProp,
        Command::UpdateAppWindowSize,
        Command::SetProxy,
        Command::UpdateDisplaySize,
        Command::AnswerCall,
    ];

    pub const fn tag(self) -> CommandTag {
        CommandTag(self as u16)
    }

    pub fn from_tag(tag: CommandTag) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    pub fn endpoint(self) -> Endpoint {
        use Command::*;
        match self {
            SetClipboard | InsertFile | RemoveFile | RequestMediaFiles | DragFile | SetProxy
            | AnswerCall => Endpoint::Manager,
            _ => Endpoint::Launcher,
        }
    }

    /// Whether the service answers this command with a reply message.
    pub const fn expects_reply(self) -> bool {
        use Command::*;
        matches!(
            self,
            InstallApp
                | UninstallApp
                | LaunchApp
                | CloseApp
                | GetInstalledAppList
                | GetRunningAppList
                | GetSystemProp
        )
    }
}

/// A request schema, the command it is sent under, and what comes back.
pub trait Message: Serialize {
    const COMMAND: Command;
    type Reply: ReplySchema;
}

/// Something a service may send back for a request.
pub trait ReplySchema {
    /// Whether a reply is read at all.
    const EXPECTED: bool;
}

/// Reply type of fire-and-forget commands. It has no values, so there is
/// nothing to decode and nothing to wait for.
#[derive(Debug)]
pub enum NoReply {}

impl ReplySchema for NoReply {
    const EXPECTED: bool = false;
}

pub fn encode<T: Serialize + ?Sized>(msg: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec(msg)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Header and encoded body in one contiguous buffer.
pub fn build_frame<M: Message>(msg: &M, tag: CommandTag) -> Result<Bytes> {
    let expected = M::COMMAND.tag();
    if tag != expected {
        return Err(Error::TagMismatch {
            expected,
            actual: tag,
        });
    }
    let body = encode(msg)?;
    let mut frame = BytesMut::with_capacity(HEADER_LEN + body.len());
    frame.put_slice(tag.header().as_bytes());
    frame.put_slice(&body);
    Ok(frame.freeze())
}

/// Split a received request frame into its tag and body.
pub fn split_frame(frame: &[u8]) -> Option<(CommandTag, &[u8])> {
    let (head, body) = frame.split_first_chunk::<HEADER_LEN>()?;
    let header = FrameHeader::from_bytes(*head)?;
    Some((header.tag(), body))
}
