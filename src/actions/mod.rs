pub mod base;
pub mod registry;

pub use base::{CommandFn, CommandFuture, RESET_COUNTER};
pub use registry::CommandRegistry;
