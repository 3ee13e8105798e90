use crate::core::DriverTrait;
use crate::errors::Result;
use crate::locators::LocatorSet;
use std::future::Future;
use std::pin::Pin;

pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// An extension command: a plain function over the automation context.
pub type CommandFn<D> = for<'a> fn(&'a D, &'a LocatorSet) -> CommandFuture<'a>;

pub const RESET_COUNTER: &str = "resetCounter";

/// Writes "0" into the counter display. Only the rendered text changes; the
/// widget's own state is untouched until the next click or `visit()`.
pub fn reset_counter<'a, D: DriverTrait>(
    driver: &'a D,
    locators: &'a LocatorSet,
) -> CommandFuture<'a> {
    Box::pin(async move { driver.set_text(locators.counter(), "0").await })
}
