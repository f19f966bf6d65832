//! Wire types for the lead backend API.

use serde::{Deserialize, Serialize};

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// A pipeline stage a lead can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStatus {
    pub id: u64,
    pub name: String,
}

/// A lead record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub lead_status_id: Option<u64>,
    /// Eager-loaded status relation, present on list responses.
    #[serde(default)]
    pub status: Option<LeadStatus>,
}

/// Fields accepted when creating or updating a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_status_id: Option<u64>,
}

impl LeadDraft {
    /// Pre-fills a draft from an existing lead, for editing.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            lead_status_id: lead.lead_status_id,
        }
    }
}

/// One page of the paginated leads listing.
///
/// The backend wraps results in a paginator envelope; only the fields the
/// client acts on are modeled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadPage {
    pub data: Vec<Lead>,
    pub last_page: u32,
}

/// Credentials for the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for the register endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Successful login response: the account plus a fresh bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}
