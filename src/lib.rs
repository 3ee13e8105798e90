pub mod actions;
pub mod browser;
pub mod core;
pub mod errors;
pub mod locators;
pub mod page;
pub mod runner;
pub mod scenarios;
pub mod testing;
pub mod types;
pub mod utils;

pub use browser::ChromeDriver;
pub use crate::core::{Config, DriverTrait, RunMode};
pub use errors::{E2eError, Result};
pub use locators::{LocatorName, LocatorSet, LocatorStrategy};
pub use page::CounterPage;
pub use runner::{ScenarioOutcome, SuiteReport, SuiteRunner};
pub use scenarios::{counter_suite, Scenario};
pub use types::*;
