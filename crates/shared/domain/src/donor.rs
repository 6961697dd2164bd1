//! Per-project donor association.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// How often a donor contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationFrequency {
    Monthly,
    OneTime,
    Occasional,
}

impl DonationFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationFrequency::Monthly => "MENSAL",
            DonationFrequency::OneTime => "UNICA",
            DonationFrequency::Occasional => "EVENTUAL",
        }
    }

    pub fn parse(stored: &str) -> DomainResult<Self> {
        match stored {
            "MENSAL" => Ok(DonationFrequency::Monthly),
            "UNICA" => Ok(DonationFrequency::OneTime),
            "EVENTUAL" => Ok(DonationFrequency::Occasional),
            other => Err(DomainError::validation(format!(
                "Unknown donation frequency '{}'",
                other
            ))),
        }
    }
}

/// Donor association keyed by (user, project)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub frequency: DonationFrequency,
    pub reminder_date: Option<NaiveDate>,
    pub last_contribution: Option<NaiveDate>,
    pub next_contribution: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Donor registration command
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDonor {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub frequency: DonationFrequency,
    pub reminder_date: Option<NaiveDate>,
    pub next_contribution: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Donor update command; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonor {
    pub frequency: Option<DonationFrequency>,
    pub reminder_date: Option<NaiveDate>,
    pub last_contribution: Option<NaiveDate>,
    pub next_contribution: Option<NaiveDate>,
    pub note: Option<String>,
}

impl Donor {
    pub fn apply(&self, update: UpdateDonor) -> Donor {
        Donor {
            user_id: self.user_id,
            project_id: self.project_id,
            frequency: update.frequency.unwrap_or(self.frequency),
            reminder_date: update.reminder_date.or(self.reminder_date),
            last_contribution: update.last_contribution.or(self.last_contribution),
            next_contribution: update.next_contribution.or(self.next_contribution),
            note: update.note.or_else(|| self.note.clone()),
        }
    }
}
