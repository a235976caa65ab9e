use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};

/// Literal used by the dropdowns and the map reset button.
pub const ALL: &str = "all";

/// One dimension of the dashboard filter: everything, or a single id.
///
/// Ids are not validated against any catalog; unknown ids are carried
/// through and resolved (or not) by display code.
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Filter {
    #[default]
    All,
    Only(String),
}

impl Filter {
    pub fn only(id: impl Into<String>) -> Self {
        Filter::Only(id.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Filter::All => None,
            Filter::Only(id) => Some(id.as_str()),
        }
    }

    /// True when `id` passes this filter.
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => wanted == id,
        }
    }
}

impl From<&str> for Filter {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL) {
            Filter::All
        } else {
            Filter::Only(trimmed.to_string())
        }
    }
}

impl From<String> for Filter {
    fn from(s: String) -> Self {
        Filter::from(s.as_str())
    }
}

impl From<Option<&str>> for Filter {
    fn from(s: Option<&str>) -> Self {
        s.map(Filter::from).unwrap_or_default()
    }
}

impl From<Filter> for String {
    fn from(f: Filter) -> Self {
        f.to_string()
    }
}

impl FromStr for Filter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Filter::from(s))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => f.write_str(ALL),
            Filter::Only(id) => f.write_str(id),
        }
    }
}

/// The dashboard's watershed and species filters.
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    pub watershed: Filter,
    pub species: Filter,
}

impl SelectionState {
    pub fn new(watershed: impl Into<Filter>, species: impl Into<Filter>) -> Self {
        Self {
            watershed: watershed.into(),
            species: species.into(),
        }
    }
}
