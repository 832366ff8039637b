pub mod interp;
pub mod runtime_error;

pub use interp::{InterpConfig, Interpreter};
pub use runtime_error::RuntimeError;
