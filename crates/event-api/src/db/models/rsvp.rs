//! RSVP model.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A guest's reply. `name` is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    /// Guest name (unique identifier)
    pub name: String,

    /// Contact phone number
    #[serde(default)]
    pub phone_number: Option<String>,

    /// Dietary restrictions, free text
    #[serde(default)]
    pub dietary_restrictions: Option<String>,

    /// Anything else the guest wants to tell the hosts
    #[serde(default)]
    pub special_notes: Option<String>,

    /// Whether the guest is attending
    #[serde(deserialize_with = "null_as_default")]
    pub attendence: bool,
}
