use serde::Deserialize;
use thiserror::Error;

const MAX_DISPLAY_NAME_CHARS: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Display name must be at most {MAX_DISPLAY_NAME_CHARS} characters")]
    DisplayNameTooLong,
    #[error("Display name contains control characters")]
    DisplayNameInvalid,
}

/// Optional profile fields collected at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    display_name: Option<String>,
}

/// Unvalidated profile fields as they arrive from the boundary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub display_name: Option<String>,
}

impl Profile {
    /// Rebuild a profile read back from storage, where it was validated on the way in.
    pub fn from_stored(display_name: Option<String>) -> Self {
        Self { display_name }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

impl TryFrom<ProfileFields> for Profile {
    type Error = ProfileError;

    fn try_from(fields: ProfileFields) -> Result<Self, Self::Error> {
        let display_name = match fields.display_name {
            None => None,
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
                    return Err(ProfileError::DisplayNameTooLong);
                }
                if trimmed.chars().any(char::is_control) {
                    return Err(ProfileError::DisplayNameInvalid);
                }
                // A blank name is the same as no name
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
        };

        Ok(Self { display_name })
    }
}
