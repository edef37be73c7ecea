use serde::{Deserialize, Serialize};

pub type UserId = String;

/// Display name used when a user has neither a name nor a first name.
pub const NO_NAME: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Image URI or data URI, filled in by the avatar loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            first_name: None,
            email: None,
            image: None,
        }
    }

    pub fn with_names(mut self, name: impl Into<String>, first_name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self.first_name = Some(first_name.into());
        self
    }

    /// Returns a copy of this user carrying `image`. The receiver is untouched.
    pub fn with_image(&self, image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..self.clone()
        }
    }

    /// "NAME First", or [`NO_NAME`] when neither part is present.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.name.as_deref(), self.first_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            NO_NAME.to_string()
        } else {
            parts.join(" ")
        }
    }

    pub fn has_display_name(&self) -> bool {
        self.display_name() != NO_NAME
    }

    /// Upper-cased first letters of first name and name, e.g. "JD".
    pub fn initials(&self) -> String {
        [self.first_name.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}
