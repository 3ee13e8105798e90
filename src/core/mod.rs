pub mod config;
pub mod driver;

pub use config::{Config, RetryConfig, RunMode, Viewport};
pub use driver::DriverTrait;
