pub mod chrome;
pub mod navigation;

pub use chrome::ChromeDriver;
pub use navigation::{NavigationManager, NavigationResult};
