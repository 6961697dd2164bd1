//! Donations: aid type, payment method and the field rules tying them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};
use crate::normalize::{AID_TYPES, PAYMENT_METHODS};

/// Nature of a donation.
///
/// Unknown tokens are kept rather than rejected; `Unrecognized` holds the
/// persisted (upper-cased) form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AidType {
    Financial,
    Items,
    Other,
    Unrecognized(String),
}

impl AidType {
    /// Parse an application token (write path)
    pub fn from_app(token: &str) -> Self {
        Self::from_stored(&AID_TYPES.to_stored(token))
    }

    /// Parse a persisted token (read path)
    pub fn from_stored(stored: &str) -> Self {
        match stored {
            "FINANCEIRA" => AidType::Financial,
            "ITENS" => AidType::Items,
            "OUTRO" => AidType::Other,
            other => AidType::Unrecognized(other.to_string()),
        }
    }

    pub fn as_stored(&self) -> &str {
        match self {
            AidType::Financial => "FINANCEIRA",
            AidType::Items => "ITENS",
            AidType::Other => "OUTRO",
            AidType::Unrecognized(token) => token.as_str(),
        }
    }

    pub fn to_app(&self) -> String {
        AID_TYPES.to_app(self.as_stored())
    }
}

impl Serialize for AidType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_app())
    }
}

impl<'de> Deserialize<'de> for AidType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(AidType::from_app(&token))
    }
}

/// How a financial donation was paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethod {
    Pix,
    Cash,
    Transfer,
    Other,
    Unrecognized(String),
}

impl PaymentMethod {
    pub fn from_app(token: &str) -> Self {
        Self::from_stored(&PAYMENT_METHODS.to_stored(token))
    }

    pub fn from_stored(stored: &str) -> Self {
        match stored {
            "PIX" => PaymentMethod::Pix,
            "DINHEIRO" => PaymentMethod::Cash,
            "TRANSFERENCIA" => PaymentMethod::Transfer,
            "OUTRO" => PaymentMethod::Other,
            other => PaymentMethod::Unrecognized(other.to_string()),
        }
    }

    pub fn as_stored(&self) -> &str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::Cash => "DINHEIRO",
            PaymentMethod::Transfer => "TRANSFERENCIA",
            PaymentMethod::Other => "OUTRO",
            PaymentMethod::Unrecognized(token) => token.as_str(),
        }
    }

    pub fn to_app(&self) -> String {
        PAYMENT_METHODS.to_app(self.as_stored())
    }
}

impl Serialize for PaymentMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_app())
    }
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(PaymentMethod::from_app(&token))
    }
}

/// Stored donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub project_id: Uuid,
    pub aid_type: AidType,
    pub payment_method: Option<PaymentMethod>,
    pub amount: Option<f64>,
    pub items_description: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// The correlated fields of a donation after applying the aid-type rules.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationShape {
    pub aid_type: AidType,
    pub payment_method: Option<PaymentMethod>,
    pub amount: Option<f64>,
    pub items_description: Option<String>,
}

impl DonationShape {
    /// Apply the per-aid-type field rules.
    ///
    /// * Financial: amount required and positive, payment method defaults to Pix,
    ///   items description dropped.
    /// * Items: amount and payment method dropped.
    /// * Other or unrecognized: amount, payment method and items dropped.
    pub fn resolve(
        aid_type: AidType,
        payment_method: Option<PaymentMethod>,
        amount: Option<f64>,
        items_description: Option<String>,
    ) -> DomainResult<Self> {
        match aid_type {
            AidType::Financial => {
                let amount = amount.ok_or_else(|| {
                    DomainError::validation("Amount is required for financial donations")
                })?;
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(DomainError::validation(
                        "Amount must be greater than zero for financial donations",
                    ));
                }
                Ok(Self {
                    aid_type,
                    payment_method: Some(payment_method.unwrap_or(PaymentMethod::Pix)),
                    amount: Some(amount),
                    items_description: None,
                })
            }
            AidType::Items => Ok(Self {
                aid_type,
                payment_method: None,
                amount: None,
                items_description: items_description.filter(|items| !items.trim().is_empty()),
            }),
            AidType::Other | AidType::Unrecognized(_) => Ok(Self {
                aid_type,
                payment_method: None,
                amount: None,
                items_description: None,
            }),
        }
    }
}

/// Donation creation command
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonation {
    /// Donor user; ignored when `anonymous` is set
    pub donor_id: Option<Uuid>,
    #[serde(default)]
    pub anonymous: bool,
    pub project_id: Uuid,
    pub aid_type: AidType,
    pub payment_method: Option<PaymentMethod>,
    pub amount: Option<f64>,
    pub items_description: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
}

/// Donation update command; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonation {
    pub aid_type: Option<AidType>,
    pub payment_method: Option<PaymentMethod>,
    pub amount: Option<f64>,
    pub items_description: Option<String>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Donation fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct DonationRecord {
    pub donor_id: Uuid,
    pub project_id: Uuid,
    pub shape: DonationShape,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl Donation {
    /// Merge an update into this donation and re-apply the field rules.
    pub fn merge(&self, update: UpdateDonation) -> DomainResult<DonationRecord> {
        let shape = DonationShape::resolve(
            update.aid_type.unwrap_or_else(|| self.aid_type.clone()),
            update.payment_method.or_else(|| self.payment_method.clone()),
            update.amount.or(self.amount),
            update
                .items_description
                .or_else(|| self.items_description.clone()),
        )?;

        Ok(DonationRecord {
            donor_id: self.donor_id,
            project_id: self.project_id,
            shape,
            date: update.date.unwrap_or(self.date),
            note: update.note.or_else(|| self.note.clone()),
        })
    }
}
