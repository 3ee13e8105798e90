//! The counter widget's end-to-end cases.
//!
//! Each scenario starts from a freshly visited page; the runner performs the
//! `visit()` so a retried scenario always restarts from the initial state.

use crate::core::DriverTrait;
use crate::errors::Result;
use crate::page::CounterPage;
use std::future::Future;
use std::pin::Pin;

pub type ScenarioFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
pub type ScenarioFn<D> = for<'a> fn(&'a CounterPage<D>) -> ScenarioFuture<'a>;

pub struct Scenario<D: DriverTrait> {
    pub group: &'static str,
    pub name: &'static str,
    pub run: ScenarioFn<D>,
}

impl<D: DriverTrait> Scenario<D> {
    pub fn new(group: &'static str, name: &'static str, run: ScenarioFn<D>) -> Self {
        Self { group, name, run }
    }

    pub fn title(&self) -> String {
        format!("{} > {}", self.group, self.name)
    }
}

impl<D: DriverTrait> Clone for Scenario<D> {
    fn clone(&self) -> Self {
        Self {
            group: self.group,
            name: self.name,
            run: self.run,
        }
    }
}

pub fn counter_suite<D: DriverTrait>() -> Vec<Scenario<D>> {
    vec![
        Scenario::new(
            "Initial State",
            "should display all UI elements correctly",
            all_elements_displayed::<D>,
        ),
        Scenario::new(
            "Initial State",
            "should display initial counter value of 0",
            initial_value_is_zero::<D>,
        ),
        Scenario::new(
            "UI Elements",
            "should have correct button text",
            button_labels::<D>,
        ),
        Scenario::new(
            "UI Elements",
            "should have visible counter display",
            counter_display::<D>,
        ),
        Scenario::new(
            "UI Elements",
            "should have proper heading structure",
            heading_structure::<D>,
        ),
        Scenario::new(
            "UI Elements",
            "should have buttons enabled and clickable",
            increment_then_decrement::<D>,
        ),
        Scenario::new(
            "Increment Operation",
            "should increment counter when clicking increment button",
            single_increment::<D>,
        ),
        Scenario::new(
            "Increment Operation",
            "should handle multiple increments",
            five_increments::<D>,
        ),
        Scenario::new(
            "Decrement Operation",
            "should not allow counter to go below 0",
            floor_at_zero::<D>,
        ),
        Scenario::new(
            "Decrement Operation",
            "should decrement counter when above 0",
            increment_then_decrement::<D>,
        ),
        Scenario::new(
            "Decrement Operation",
            "should stay at 0 after each of three decrements",
            three_decrements_at_zero::<D>,
        ),
        Scenario::new(
            "Decrement Operation",
            "should handle multiple decrements stopping at 0",
            step_down_to_zero::<D>,
        ),
        Scenario::new(
            "Edge Cases",
            "should handle rapid clicks correctly",
            rapid_clicks::<D>,
        ),
        Scenario::new(
            "Edge Cases",
            "should always maintain non-negative values",
            always_non_negative::<D>,
        ),
    ]
}

fn all_elements_displayed<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.verify_all().await?;
        Ok(())
    })
}

fn initial_value_is_zero<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.assert_value(0).await?;
        Ok(())
    })
}

fn button_labels<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.verify_labels().await?;
        Ok(())
    })
}

fn counter_display<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.verify_display().await?;
        Ok(())
    })
}

fn heading_structure<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.verify_structure().await?;
        Ok(())
    })
}

fn increment_then_decrement<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.increment()
            .await?
            .assert_value(1)
            .await?
            .decrement()
            .await?
            .assert_value(0)
            .await?;
        Ok(())
    })
}

fn single_increment<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.increment().await?.assert_value(1).await?;
        Ok(())
    })
}

fn five_increments<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.increment()
            .await?
            .increment()
            .await?
            .increment()
            .await?
            .increment()
            .await?
            .increment()
            .await?
            .assert_value(5)
            .await?;
        Ok(())
    })
}

fn floor_at_zero<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.verify_floor_at_zero().await?;
        Ok(())
    })
}

fn three_decrements_at_zero<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.assert_value(0).await?;
        for _ in 0..3 {
            page.decrement().await?.assert_value(0).await?;
        }
        Ok(())
    })
}

fn step_down_to_zero<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        for _ in 0..5 {
            page.increment().await?;
        }
        page.assert_value(5).await?;

        for expected in (0..5).rev() {
            page.decrement().await?.assert_value(expected).await?;
        }

        page.decrement().await?.assert_value(0).await?;
        Ok(())
    })
}

fn rapid_clicks<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        for _ in 0..5 {
            page.increment().await?;
        }
        page.assert_value(5).await?;

        for _ in 0..7 {
            page.decrement().await?;
        }
        page.assert_value(0).await?;
        Ok(())
    })
}

fn always_non_negative<'a, D: DriverTrait>(page: &'a CounterPage<D>) -> ScenarioFuture<'a> {
    Box::pin(async move {
        page.assert_value(0)
            .await?
            .decrement()
            .await?
            .assert_value(0)
            .await?
            .increment()
            .await?
            .decrement()
            .await?
            .decrement()
            .await?
            .assert_value(0)
            .await?;
        Ok(())
    })
}
