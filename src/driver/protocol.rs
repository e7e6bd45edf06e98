//! Line-delimited JSON messages between the coordinator and worker processes.
//!
//! Workers write [`WorkerMsg`] to stdout; the coordinator writes [`ControlMsg`] to each worker's
//! stdin. One message per line.

use std::io::{BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::foundation::error::{CrossfadeError, CrossfadeResult};
use crate::timing::UnitResult;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum WorkerMsg {
    /// Inputs loaded and scratch allocated; waiting at the start barrier.
    Ready { rank: u32 },
    /// Setup failed; the worker exits after sending this.
    SetupFailed { rank: u32, message: String },
    /// Frame loop finished.
    Done { result: UnitResult },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ControlMsg {
    /// Every worker is ready; start the timed frame loop.
    Start,
    /// Another participant failed setup; exit without doing frame work.
    Abort,
}

pub(crate) fn write_msg<W: Write, T: Serialize>(w: &mut W, msg: &T) -> CrossfadeResult<()> {
    let mut line = serde_json::to_vec(msg)
        .map_err(|e| CrossfadeError::serde(format!("encode message: {e}")))?;
    line.push(b'\n');
    w.write_all(&line)
        .and_then(|()| w.flush())
        .map_err(|e| CrossfadeError::coordination(format!("send message: {e}")))
}

/// Read one message; `Ok(None)` on end of stream.
pub(crate) fn read_msg<R: BufRead, T: DeserializeOwned>(r: &mut R) -> CrossfadeResult<Option<T>> {
    let mut line = String::new();
    let n = r
        .read_line(&mut line)
        .map_err(|e| CrossfadeError::coordination(format!("receive message: {e}")))?;
    if n == 0 {
        return Ok(None);
    }
    serde_json::from_str(line.trim_end())
        .map(Some)
        .map_err(|e| CrossfadeError::serde(format!("decode message {:?}: {e}", line.trim_end())))
}
