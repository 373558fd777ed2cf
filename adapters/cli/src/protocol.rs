//! Line protocol spoken over stdin and stdout.
//!
//! Each inbound line drives one frame. An empty line is a plain tick; any
//! other line carries a JSON [`Command`], a JSON array of commands, or a
//! `genesis_plane` request. Each frame is answered with one `state_update`
//! JSON line.

use std::io::{self, BufRead};

use ghost_void_core::{Command, Event, Vector2};
use ghost_void_sandbox::{CommandSource, Frame, SandboxSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bare keyword accepted in place of a JSON genesis request.
const GENESIS_KEYWORD: &str = "genesis_plane";
const GENESIS_ORIGIN: Vector2 = Vector2::new(0.0, 500.0);
const GENESIS_WIDTH: f32 = 1000.0;
const GENESIS_HEIGHT: f32 = 50.0;

/// Errors raised while decoding an inbound line.
#[derive(Debug, Error)]
pub(crate) enum ProtocolError {
    /// The line was neither a command, a command list, nor a genesis request.
    #[error("could not parse command line: {0}")]
    InvalidMessage(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InboundMessage {
    Genesis(GenesisRequest),
    Batch(Vec<Command>),
    Single(Command),
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum GenesisRequest {
    #[serde(rename = "genesis_plane")]
    GenesisPlane {
        #[serde(default = "genesis_origin")]
        origin: Vector2,
        #[serde(default)]
        dimensions: Dimensions,
    },
}

#[derive(Deserialize)]
#[serde(default)]
struct Dimensions {
    w: f32,
    h: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            w: GENESIS_WIDTH,
            h: GENESIS_HEIGHT,
        }
    }
}

fn genesis_origin() -> Vector2 {
    GENESIS_ORIGIN
}

/// Decodes the commands carried by one inbound line.
pub(crate) fn parse_line(line: &str) -> Result<Vec<Command>, ProtocolError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed == GENESIS_KEYWORD {
        return Ok(vec![Command::SpawnPlane {
            origin: GENESIS_ORIGIN,
            width: GENESIS_WIDTH,
            height: GENESIS_HEIGHT,
        }]);
    }

    let commands = match serde_json::from_str(trimmed)? {
        InboundMessage::Genesis(GenesisRequest::GenesisPlane { origin, dimensions }) => {
            vec![Command::SpawnPlane {
                origin,
                width: dimensions.w,
                height: dimensions.h,
            }]
        }
        InboundMessage::Batch(commands) => commands,
        InboundMessage::Single(command) => vec![command],
    };
    Ok(commands)
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutboundMessage<'a> {
    StateUpdate {
        snapshot: &'a SandboxSnapshot,
        events: &'a [Event],
    },
}

/// Encodes a frame as a single `state_update` JSON line without the newline.
pub(crate) fn encode_frame(frame: &Frame) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutboundMessage::StateUpdate {
        snapshot: &frame.snapshot,
        events: &frame.events,
    })
}

/// Command source that reads one frame per line.
///
/// Malformed lines are logged and run as plain ticks. A read failure ends the
/// stream and is kept for the caller to inspect.
#[derive(Debug)]
pub(crate) struct LineSource<R> {
    reader: R,
    buffer: String,
    error: Option<io::Error>,
}

impl<R: BufRead> LineSource<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            error: None,
        }
    }

    /// Read failure that ended the stream, if any.
    pub(crate) fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

impl<R: BufRead> CommandSource for LineSource<R> {
    fn next_frame(&mut self) -> Option<Vec<Command>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => match parse_line(&self.buffer) {
                Ok(commands) => Some(commands),
                Err(error) => {
                    tracing::warn!(%error, "ignoring malformed line");
                    Some(Vec::new())
                }
            },
            Err(error) => {
                self.error = Some(error);
                None
            }
        }
    }
}
