//! Address Models

use jiff::Timestamp;

use crate::{auth::UserUuid, uuids::TypedUuid};

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub uuid: AddressUuid,
    pub user_uuid: UserUuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Address Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub full_name: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
}

impl NewAddress {
    /// The first required field that is blank, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("full_name", &self.full_name),
            ("address_line1", &self.address_line1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .find_map(|(field, value)| value.trim().is_empty().then_some(field))
    }
}

/// Address Update Model; absent fields are left unchanged.
///
/// Nullable columns take `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressUpdate {
    pub full_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub address_line1: Option<String>,
    pub address_line2: Option<Option<String>>,
    pub city: Option<String>,
    pub state: Option<Option<String>>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
}

impl AddressUpdate {
    /// The first required field that is present but blank, if any.
    #[must_use]
    pub fn blank_field(&self) -> Option<&'static str> {
        [
            ("full_name", &self.full_name),
            ("address_line1", &self.address_line1),
            ("city", &self.city),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ]
        .into_iter()
        .find_map(|(field, value)| {
            value
                .as_deref()
                .is_some_and(|value| value.trim().is_empty())
                .then_some(field)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_address() -> NewAddress {
        NewAddress {
            full_name: "Ada Lovelace".to_string(),
            phone: None,
            address_line1: "12 St James's Square".to_string(),
            address_line2: None,
            city: "London".to_string(),
            state: None,
            postal_code: "SW1Y 4JH".to_string(),
            country: "GB".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn complete_address_has_no_missing_field() {
        assert_eq!(new_address().missing_field(), None);
    }

    #[test]
    fn blank_city_is_reported() {
        let address = NewAddress {
            city: "  ".to_string(),
            ..new_address()
        };

        assert_eq!(address.missing_field(), Some("city"));
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert_eq!(AddressUpdate::default().blank_field(), None);

        let update = AddressUpdate {
            country: Some(String::new()),
            ..AddressUpdate::default()
        };

        assert_eq!(update.blank_field(), Some("country"));
    }
}
