use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

const MAX_KEY_LEN: usize = 100;

/// Flat `{key: value}` object, used both to read and to upsert settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SettingsPayload(pub BTreeMap<String, String>);

impl SettingsPayload {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

impl FromIterator<(String, String)> for SettingsPayload {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        SettingsPayload(iter.into_iter().collect())
    }
}

impl Validate for SettingsPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for key in self.0.keys() {
            if key.trim().is_empty() || key.len() > MAX_KEY_LEN {
                let mut err = ValidationError::new("key");
                err.message = Some(format!("Invalid settings key '{}'", key).into());
                errors.add("settings", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
