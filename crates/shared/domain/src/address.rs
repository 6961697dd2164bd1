//! Address entity and the candidate fields owners submit for it.
//!
//! Addresses are detached rows referenced by id from users and projects.
//! They are shared by reference, never owned, and never deleted by owners.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored address row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    /// Postal code (CEP), digits only
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub district: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

/// Address fields as submitted with a user or project write.
///
/// Every field is optional; the candidate only becomes an address when the
/// four mandatory fields are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

/// Address fields ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
    pub postal_code: String,
    pub state: String,
    pub city: String,
    pub district: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
}

impl AddressInput {
    /// Resolve the candidate into writable fields.
    ///
    /// Returns `None` when postal code, district, city or state is missing
    /// or blank; the owner then keeps whatever reference it already has.
    pub fn resolve(&self) -> Option<AddressFields> {
        let postal_code = present(&self.postal_code)?;
        let district = present(&self.district)?;
        let city = present(&self.city)?;
        let state = present(&self.state)?;

        Some(AddressFields {
            postal_code: digits_only(postal_code),
            state: state.to_string(),
            city: city.to_string(),
            district: district.to_string(),
            street: present(&self.street).map(str::to_string),
            number: present(&self.number).map(str::to_string),
            complement: present(&self.complement).map(str::to_string),
        })
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Strip every non-digit character from a postal code
pub fn digits_only(postal_code: &str) -> String {
    postal_code.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> AddressInput {
        AddressInput {
            postal_code: Some("01310-930".into()),
            state: Some("SP".into()),
            city: Some("São Paulo".into()),
            district: Some("Bela Vista".into()),
            street: Some("Av. Paulista".into()),
            number: Some("2100".into()),
            complement: None,
        }
    }

    #[test]
    fn test_complete_candidate_resolves_with_digit_only_postal_code() {
        let fields = paulista().resolve().unwrap();
        assert_eq!(fields.postal_code, "01310930");
        assert_eq!(fields.city, "São Paulo");
        assert_eq!(fields.complement, None);
    }

    #[test]
    fn test_missing_mandatory_field_resolves_to_none() {
        let mut input = paulista();
        input.district = None;
        assert!(input.resolve().is_none());

        let mut input = paulista();
        input.state = Some("   ".into());
        assert!(input.resolve().is_none());
    }

    #[test]
    fn test_optional_fields_do_not_gate_resolution() {
        let input = AddressInput {
            street: None,
            number: None,
            ..paulista()
        };
        assert!(input.resolve().is_some());
    }
}
