use std::io;

use thiserror::Error;

use crate::frontend::decode::DecodeError;
use crate::lang::header::Header;

/// Fatal interpretation error. Nothing is recovered; the CLI reports it
/// and exits.
///
/// `line` fields are 1-based source line numbers.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("line {line}: {header} expects {expected} on the next line, found end of input")]
    TruncatedInput {
        line: usize,
        header: Header,
        expected: &'static str,
    },

    #[error("line {line}: loop subtype must be a multiple of 4 symbols long, got {len}")]
    MalformedSubtype { line: usize, len: usize },

    #[error("line {line}: while loop expects a Comparison header")]
    MissingComparison { line: usize },

    #[error("line {line}: while loop has no Loops/End marker")]
    UnterminatedLoop { line: usize },

    #[error("line {line}: cannot interpret {text:?} as a value")]
    UninterpretableValue { line: usize, text: String },

    #[error("line {line}: loop subtype {subtype} is not implemented")]
    UnsupportedLoopSubtype { line: usize, subtype: usize },

    #[error("line {line}: {source}")]
    Decode { line: usize, source: DecodeError },

    #[error("line {line}: cannot compare {left} {op} {right}")]
    IncomparableValues {
        line: usize,
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("execution step limit exceeded ({0})")]
    StepLimit(usize),

    #[error("sub-program nesting limit exceeded ({0})")]
    DepthLimit(usize),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    pub fn decode(line: usize) -> impl FnOnce(DecodeError) -> RuntimeError {
        move |source| RuntimeError::Decode { line, source }
    }

    /// Source line the error points at, when it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::TruncatedInput { line, .. }
            | RuntimeError::MalformedSubtype { line, .. }
            | RuntimeError::MissingComparison { line }
            | RuntimeError::UnterminatedLoop { line }
            | RuntimeError::UninterpretableValue { line, .. }
            | RuntimeError::UnsupportedLoopSubtype { line, .. }
            | RuntimeError::Decode { line, .. }
            | RuntimeError::IncomparableValues { line, .. } => Some(*line),
            RuntimeError::StepLimit(_)
            | RuntimeError::DepthLimit(_)
            | RuntimeError::Output(_) => None,
        }
    }
}
