use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of access, without the payload.
///
/// The numeric encoding (`0` = read, `1` = write) is the one external
/// drivers use when they speak in raw codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    Read,
    Write,
}

impl OpCode {
    pub fn as_u8(self) -> u8 {
        match self {
            OpCode::Read => 0,
            OpCode::Write => 1,
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = TypeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(OpCode::Read),
            1 => Ok(OpCode::Write),
            other => Err(TypeError::InvalidOpCode(other)),
        }
    }
}

impl FromStr for OpCode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" | "r" => Ok(OpCode::Read),
            "write" | "w" => Ok(OpCode::Write),
            _ => Err(TypeError::InvalidOpName(s.to_string())),
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpCode::Read => write!(f, "read"),
            OpCode::Write => write!(f, "write"),
        }
    }
}

/// A logical access request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op<V> {
    /// Return the block's current payload.
    Read,
    /// Replace the block's payload.
    Write(V),
}

impl<V> Op<V> {
    pub fn code(&self) -> OpCode {
        match self {
            Op::Read => OpCode::Read,
            Op::Write(_) => OpCode::Write,
        }
    }

    /// Build a request from a code and a payload. The payload is dropped for
    /// reads.
    pub fn from_code(code: OpCode, value: V) -> Self {
        match code {
            OpCode::Read => Op::Read,
            OpCode::Write => Op::Write(value),
        }
    }
}

/// Outcome of a completed access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response<V> {
    /// Payload returned by a read.
    Value(V),
    /// Fixed acknowledgement returned by a write.
    Written,
}

impl<V> Response<V> {
    pub fn is_written(&self) -> bool {
        matches!(self, Response::Written)
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Response::Value(v) => Some(v),
            Response::Written => None,
        }
    }

    pub fn into_value(self) -> Option<V> {
        match self {
            Response::Value(v) => Some(v),
            Response::Written => None,
        }
    }
}
