//! Team member model.
//!
//! A member is a person who can be assigned to activity occurrences.
//! Assignment fairness is tracked through `participation_count`, which is
//! owned by the schedule generator: it is reset at the start of every
//! generation run and incremented once per assignment. No other code path
//! mutates it.

use serde::{Deserialize, Serialize};

use super::RecordId;

/// A roster member who can be assigned to occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique member identifier. Immutable after creation.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Contact address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether the member is eligible for assignment.
    pub status: MemberStatus,
    /// Occurrences assigned in the current generation run.
    pub participation_count: u32,
}

/// Member eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    /// Eligible for assignment.
    Active,
    /// Kept on the roster but never assigned.
    Inactive,
}

impl Member {
    /// Whether this member is eligible for assignment.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Field values for creating a member.
///
/// The store fills in the rest: a fresh id, `Active` status, and a zero
/// participation count.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    /// Display name (validated as non-empty by the form layer).
    pub name: String,
    /// Contact address, if any.
    #[serde(default)]
    pub email: Option<String>,
}

impl MemberDraft {
    /// Creates a draft with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Partial update for a member.
///
/// Absent fields leave the record untouched. `participation_count` is
/// deliberately not patchable; it belongs to the generator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status: Option<MemberStatus>,
}

impl MemberPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the contact address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the eligibility status.
    pub fn with_status(mut self, status: MemberStatus) -> Self {
        self.status = Some(status);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_draft_builder() {
        let draft = MemberDraft::new("Ada").with_email("ada@example.com");
        assert_eq!(draft.name, "Ada");
        assert_eq!(draft.email.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_member_is_active() {
        let mut member = Member {
            id: 1,
            name: "Ada".into(),
            email: None,
            status: MemberStatus::Active,
            participation_count: 0,
        };
        assert!(member.is_active());
        member.status = MemberStatus::Inactive;
        assert!(!member.is_active());
    }

    #[test]
    fn test_member_serialized_form() {
        let member = Member {
            id: 7,
            name: "Grace".into(),
            email: None,
            status: MemberStatus::Inactive,
            participation_count: 2,
        };
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["participationCount"], 2);
        assert_eq!(json["status"], "inactive");
        // Absent email is omitted entirely.
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_patch_deserializes_partial_fields() {
        let patch: MemberPatch = serde_json::from_str(r#"{"status":"inactive"}"#).unwrap();
        assert!(patch.name.is_none());
        assert!(patch.email.is_none());
        assert_eq!(patch.status, Some(MemberStatus::Inactive));
    }
}
