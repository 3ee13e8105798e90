use crate::errors::{E2eError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic names of the elements the counter widget renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorName {
    Counter,
    Increment,
    Decrement,
    Heading,
}

impl LocatorName {
    pub const ALL: [LocatorName; 4] = [
        LocatorName::Counter,
        LocatorName::Increment,
        LocatorName::Decrement,
        LocatorName::Heading,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocatorName::Counter => "counter",
            LocatorName::Increment => "increment",
            LocatorName::Decrement => "decrement",
            LocatorName::Heading => "heading",
        }
    }
}

impl fmt::Display for LocatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which built-in selector set to target the widget with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    #[default]
    DataAttributes,
    Ids,
}

impl LocatorStrategy {
    pub fn locator_set(self) -> LocatorSet {
        match self {
            LocatorStrategy::DataAttributes => LocatorSet::data_attributes(),
            LocatorStrategy::Ids => LocatorSet::id_selectors(),
        }
    }
}

/// Selectors for the four widget elements. Immutable once built; deserializing
/// goes through [`LocatorSetBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LocatorSetBuilder")]
pub struct LocatorSet {
    counter: String,
    increment: String,
    decrement: String,
    heading: String,
}

impl LocatorSet {
    pub fn builder() -> LocatorSetBuilder {
        LocatorSetBuilder::default()
    }

    /// `data-testid` selectors. Survive markup and styling changes.
    pub fn data_attributes() -> Self {
        Self {
            counter: r#"[data-testid="counter"]"#.to_string(),
            increment: r#"[data-testid="increment-btn"]"#.to_string(),
            decrement: r#"[data-testid="decrement-btn"]"#.to_string(),
            heading: r#"[data-testid="counter-heading"]"#.to_string(),
        }
    }

    /// Element ids and the bare `h1` tag, for markup without test ids.
    pub fn id_selectors() -> Self {
        Self {
            counter: "#counter".to_string(),
            increment: "#increment-btn".to_string(),
            decrement: "#decrement-btn".to_string(),
            heading: "h1".to_string(),
        }
    }

    pub fn get(&self, name: LocatorName) -> &str {
        match name {
            LocatorName::Counter => &self.counter,
            LocatorName::Increment => &self.increment,
            LocatorName::Decrement => &self.decrement,
            LocatorName::Heading => &self.heading,
        }
    }

    /// Inverse lookup, used by drivers that model the widget directly.
    pub fn name_of(&self, selector: &str) -> Option<LocatorName> {
        LocatorName::ALL
            .into_iter()
            .find(|name| self.get(*name) == selector)
    }

    pub fn counter(&self) -> &str {
        &self.counter
    }

    pub fn increment(&self) -> &str {
        &self.increment
    }

    pub fn decrement(&self) -> &str {
        &self.decrement
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }
}

impl Default for LocatorSet {
    fn default() -> Self {
        Self::data_attributes()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocatorSetBuilder {
    counter: Option<String>,
    increment: Option<String>,
    decrement: Option<String>,
    heading: Option<String>,
}

impl LocatorSetBuilder {
    pub fn with(mut self, name: LocatorName, selector: impl Into<String>) -> Self {
        let slot = match name {
            LocatorName::Counter => &mut self.counter,
            LocatorName::Increment => &mut self.increment,
            LocatorName::Decrement => &mut self.decrement,
            LocatorName::Heading => &mut self.heading,
        };
        *slot = Some(selector.into());
        self
    }

    pub fn counter(self, selector: impl Into<String>) -> Self {
        self.with(LocatorName::Counter, selector)
    }

    pub fn increment(self, selector: impl Into<String>) -> Self {
        self.with(LocatorName::Increment, selector)
    }

    pub fn decrement(self, selector: impl Into<String>) -> Self {
        self.with(LocatorName::Decrement, selector)
    }

    pub fn heading(self, selector: impl Into<String>) -> Self {
        self.with(LocatorName::Heading, selector)
    }

    pub fn build(self) -> Result<LocatorSet> {
        Ok(LocatorSet {
            counter: require(LocatorName::Counter, self.counter)?,
            increment: require(LocatorName::Increment, self.increment)?,
            decrement: require(LocatorName::Decrement, self.decrement)?,
            heading: require(LocatorName::Heading, self.heading)?,
        })
    }
}

impl TryFrom<LocatorSetBuilder> for LocatorSet {
    type Error = E2eError;

    fn try_from(builder: LocatorSetBuilder) -> Result<Self> {
        builder.build()
    }
}

fn require(name: LocatorName, selector: Option<String>) -> Result<String> {
    match selector {
        Some(selector) if !selector.trim().is_empty() => Ok(selector),
        Some(_) => Err(E2eError::ConfigurationError(format!(
            "locator `{}` is empty",
            name
        ))),
        None => Err(E2eError::ConfigurationError(format!(
            "locator `{}` is missing",
            name
        ))),
    }
}
