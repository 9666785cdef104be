//! Users and their stated preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// Tastes the user declared explicitly in their profile, as opposed to the
/// ones inferred from interactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitPreferences {
  #[serde(default)]
  pub genres:           Vec<String>,
  #[serde(default)]
  pub favorite_artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id:                   UserId,
  pub username:             String,
  pub display_name:         Option<String>,
  pub explicit_preferences: Option<ExplicitPreferences>,
  pub created_at:           DateTime<Utc>,
}

/// Input to [`crate::store::CatalogStore::add_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
  pub username:             String,
  #[serde(default)]
  pub display_name:         Option<String>,
  #[serde(default)]
  pub explicit_preferences: Option<ExplicitPreferences>,
}

impl NewUser {
  pub fn new(username: impl Into<String>) -> Self {
    Self {
      username:             username.into(),
      display_name:         None,
      explicit_preferences: None,
    }
  }

  pub fn with_preferences(mut self, prefs: ExplicitPreferences) -> Self {
    self.explicit_preferences = Some(prefs);
    self
  }
}
