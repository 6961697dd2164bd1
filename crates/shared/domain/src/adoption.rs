//! Adoptions and their append-only follow-up records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// (project, adopter, animal) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adoption {
    pub id: Uuid,
    pub project_id: Uuid,
    pub adopter_id: Uuid,
    pub animal_id: Uuid,
    pub adoption_date: NaiveDate,
    /// Rewritten every time a follow-up is recorded
    pub last_update: Option<NaiveDate>,
}

/// Adoption creation command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdoption {
    pub project_id: Uuid,
    pub adopter_id: Uuid,
    pub animal_id: Uuid,
    pub adoption_date: NaiveDate,
}

/// Outcome of a follow-up contact with the adopter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    Ok,
    Pending,
    VisitScheduled,
    NoResponse,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Ok => "ok",
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::VisitScheduled => "visit_scheduled",
            FollowUpStatus::NoResponse => "no_response",
        }
    }

    pub fn parse(stored: &str) -> DomainResult<Self> {
        match stored {
            "ok" => Ok(FollowUpStatus::Ok),
            "pending" => Ok(FollowUpStatus::Pending),
            "visit_scheduled" => Ok(FollowUpStatus::VisitScheduled),
            "no_response" => Ok(FollowUpStatus::NoResponse),
            other => Err(DomainError::validation(format!(
                "Unknown follow-up status '{}'",
                other
            ))),
        }
    }
}

/// Append-only follow-up note on an adoption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionUpdate {
    pub id: Uuid,
    pub adoption_id: Uuid,
    pub responsible_id: Uuid,
    pub status: FollowUpStatus,
    pub next_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Follow-up creation command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAdoptionUpdate {
    pub status: FollowUpStatus,
    pub next_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Follow-up row about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdoptionUpdate {
    pub adoption_id: Uuid,
    pub responsible_id: Uuid,
    pub status: FollowUpStatus,
    pub next_date: Option<NaiveDate>,
    pub note: Option<String>,
}
