//! Interpreter for fardthon, a language whose every line is a run of the
//! four symbols `f a r d`.
//!
//! - [`frontend`] decodes lines into numbers and text.
//! - [`lang`] holds headers, values and loaded programs.
//! - [`runtime`] executes programs.

pub mod frontend;
pub mod lang;
pub mod runtime;
