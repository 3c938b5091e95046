//! Identity — one enrolled person.
//!
//! An identity is linked to at most one template slot on the sensor. The slot
//! is unique across all identities and is the key the identification workflow
//! resolves a fingerprint match through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned when the enrolling client does not supply one.
pub const DEFAULT_ROLE: &str = "student";

/// A persisted identity. Never deleted; only `template_pos` may change, and
/// only through offline slot assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub user_id:       i64,
  pub full_name:     String,
  pub role:          String,
  /// Position of the fingerprint template in sensor storage.
  pub template_pos:  Option<u32>,
  pub date_enrolled: DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::add_identity`].
/// `user_id` and `date_enrolled` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub full_name:    String,
  pub role:         String,
  pub template_pos: Option<u32>,
}

impl NewIdentity {
  /// An identity with the default role and no template slot.
  pub fn new(full_name: impl Into<String>) -> Self {
    Self {
      full_name:    full_name.into(),
      role:         DEFAULT_ROLE.to_owned(),
      template_pos: None,
    }
  }

  pub fn with_role(mut self, role: impl Into<String>) -> Self {
    self.role = role.into();
    self
  }

  pub fn with_slot(mut self, slot: u32) -> Self {
    self.template_pos = Some(slot);
    self
  }
}
