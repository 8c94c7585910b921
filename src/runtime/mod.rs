//! The sandboxed script runtime: values, scopes, the tree-walking interpreter and its host globals.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`); the engine owns one [`Interpreter`] per test
//! session and drives it from a blocking worker.

pub(crate) mod builtins;
pub mod capabilities;
pub mod error;
pub mod inspect;
pub mod interp;
pub mod limits;
pub mod scope;
pub mod value;

pub use capabilities::CapabilitySet;
pub use error::{Halt, Interrupt};
pub use inspect::inspect;
pub use interp::Interpreter;
pub use limits::Limits;
pub use scope::{BindingKind, Scope};
pub use value::Value;
