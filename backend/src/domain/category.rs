//! Category entity.

use serde::{Deserialize, Serialize};

use super::CategoryId;
use super::validation::{NameValidationError, normalise_name};

/// Validated category name: non-blank, trimmed, at most 255 characters.
///
/// # Examples
/// ```
/// use orderdesk::domain::CategoryName;
///
/// let name = CategoryName::new(" Electronics ").expect("valid name");
/// assert_eq!(name.to_string(), "Electronics");
/// assert!(CategoryName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Validate and construct a category name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NameValidationError> {
        normalise_name(raw.as_ref()).map(Self)
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CategoryName {
    type Error = NameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

/// Persisted category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Server-assigned identifier.
    pub id: CategoryId,
    /// Unique display name.
    pub name: CategoryName,
}
