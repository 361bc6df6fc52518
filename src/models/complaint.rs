use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::hex_string_as_object_id;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::User;
use crate::utils::{FieldError, Validator};

/// Lifecycle of a complaint. Serialized as `pending`, `in-progress`, `resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in-progress",
            ComplaintStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

/// Complaint document (collection "complaints"). Field names follow the
/// existing collection: camelCase, `submittedBy` as an ObjectId reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: String,
    #[serde(default)]
    pub status: ComplaintStatus,
    /// Hex id of the user who submitted it. Never changes after creation.
    #[serde(with = "hex_string_as_object_id")]
    pub submitted_by: String,
    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

impl Complaint {
    /// Builds a fresh complaint; every new complaint starts `pending`.
    pub fn new(fields: ComplaintFields, submitted_by: &str) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: ObjectId::new(),
            name: fields.name,
            email: fields.email,
            contact: fields.contact,
            description: fields.description,
            status: ComplaintStatus::Pending,
            submitted_by: submitted_by.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_submitted_by(&self, user_id: &str) -> bool {
        self.submitted_by == user_id
    }
}

/// Validated complaint input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintFields {
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: String,
}

/// Body of `POST /api/complaints`
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct CreateComplaintRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub description: Option<String>,
}

impl CreateComplaintRequest {
    pub fn validate(&self) -> Result<ComplaintFields, Vec<FieldError>> {
        let mut v = Validator::new();
        let name = v.required("name", self.name.as_deref(), "Name is required");
        let email = v.email("email", self.email.as_deref(), "Please include a valid email");
        let contact = v.required("contact", self.contact.as_deref(), "Contact is required");
        let description = v.required(
            "description",
            self.description.as_deref(),
            "Description is required",
        );
        v.finish()?;

        Ok(ComplaintFields {
            name,
            email,
            contact,
            description,
        })
    }
}

/// Body of `PUT /api/complaints/{id}/status`
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(default)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `in-progress`, `resolved`
    pub status: Option<String>,
}

impl UpdateStatusRequest {
    pub fn validate(&self) -> Result<ComplaintStatus, Vec<FieldError>> {
        let message = "Status must be one of: pending, in-progress, resolved";
        self.status
            .as_deref()
            .and_then(|s| s.parse::<ComplaintStatus>().ok())
            .ok_or_else(|| vec![FieldError::new("status", message)])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SubmitterInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub username: String,
}

impl From<&User> for SubmitterInfo {
    fn from(user: &User) -> Self {
        SubmitterInfo {
            id: user.id.to_hex(),
            name: user.name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Submitter as returned on the wire: a bare id, or the joined user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SubmittedBy {
    Id(String),
    User(SubmitterInfo),
}

/// Complaint response
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub submitted_by: SubmittedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintResponse {
    /// Response with `submittedBy` replaced by the submitter's public info.
    /// Falls back to the bare id when the account no longer exists.
    pub fn with_submitter(complaint: Complaint, submitter: Option<&User>) -> Self {
        let submitted_by = match submitter {
            Some(user) => SubmittedBy::User(SubmitterInfo::from(user)),
            None => SubmittedBy::Id(complaint.submitted_by.clone()),
        };
        let mut response = ComplaintResponse::from(complaint);
        response.submitted_by = submitted_by;
        response
    }
}

impl From<Complaint> for ComplaintResponse {
    fn from(complaint: Complaint) -> Self {
        ComplaintResponse {
            id: complaint.id.to_hex(),
            name: complaint.name,
            email: complaint.email,
            contact: complaint.contact,
            description: complaint.description,
            status: complaint.status,
            submitted_by: SubmittedBy::Id(complaint.submitted_by),
            created_at: to_chrono(complaint.created_at),
            updated_at: to_chrono(complaint.updated_at),
        }
    }
}

pub(crate) fn to_chrono(dt: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
