//! # Fardthon language model
//!
//! This module defines the data the interpreter works on. A program is a
//! list of non-blank source lines; each line is either a header (a run of
//! symbol quadruplets whose count names an instruction) or a data line
//! decoded into a [`value::Value`].
//!
//! ## Documentation conventions
//!
//! - "reps" is the number of 4-symbol groups in a line.
//! - Line numbers are 1-based and refer to the original source file.

pub mod header;
pub mod program;
pub mod value;
