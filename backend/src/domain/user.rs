//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum allowed length for a display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 64;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Display name was blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
    /// Display name exceeded [`DISPLAY_NAME_MAX`].
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let name: String = raw.into();
        if name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if name.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A registered user who can drive, ride, or administer a car-share.
///
/// Anonymous users have not attached an external identity yet; linked users
/// have. Neither flag affects trip participation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    display_name: DisplayName,
    is_anonymous: bool,
    is_linked: bool,
}

impl User {
    /// Build a user from validated components. Both flags start cleared.
    #[must_use]
    pub const fn new(id: UserId, display_name: DisplayName) -> Self {
        Self {
            id,
            display_name,
            is_anonymous: false,
            is_linked: false,
        }
    }

    /// Set the anonymous flag.
    #[must_use]
    pub const fn with_anonymous(mut self, is_anonymous: bool) -> Self {
        self.is_anonymous = is_anonymous;
        self
    }

    /// Set the linked flag.
    #[must_use]
    pub const fn with_linked(mut self, is_linked: bool) -> Self {
        self.is_linked = is_linked;
        self
    }

    /// Stable user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name shown to other users.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Whether the user has no external identity attached.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }

    /// Whether the user has linked an external identity.
    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.is_linked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn display_name_rejects_blank(#[case] raw: &str) {
        assert_eq!(
            DisplayName::new(raw),
            Err(UserValidationError::EmptyDisplayName)
        );
    }

    #[rstest]
    fn display_name_rejects_overlong_values() {
        let raw = "x".repeat(DISPLAY_NAME_MAX + 1);
        assert_eq!(
            DisplayName::new(raw),
            Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX
            })
        );
    }

    #[rstest]
    fn user_flags_default_to_false() {
        let user = User::new(
            UserId::random(),
            DisplayName::new("Grace").expect("valid name"),
        );
        assert!(!user.is_anonymous());
        assert!(!user.is_linked());
    }

    #[rstest]
    fn user_serialises_flags_in_camel_case() {
        let id = UserId::random();
        let user = User::new(id, DisplayName::new("Grace").expect("valid name"))
            .with_anonymous(true);

        let value = serde_json::to_value(&user).expect("serialises");
        assert_eq!(value["id"], serde_json::json!(id.to_string()));
        assert_eq!(value["displayName"], "Grace");
        assert_eq!(value["isAnonymous"], true);
        assert_eq!(value["isLinked"], false);
    }
}
