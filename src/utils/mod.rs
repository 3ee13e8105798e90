pub mod javascript;
pub mod poll;
pub mod screenshot;

pub use poll::{poll_until, PollOptions, PollTimeout, Probe};
pub use screenshot::ScreenshotManager;
