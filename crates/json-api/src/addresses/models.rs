//! Address request and response models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use storefront_app::domain::addresses::models::{Address, AddressUpdate, NewAddress};

/// Address Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.uuid.into_uuid(),
            full_name: address.full_name,
            phone: address.phone,
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
            is_default: address.is_default,
            created_at: address.created_at.to_string(),
            updated_at: address.updated_at.to_string(),
        }
    }
}

/// Single address envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressEnvelope {
    pub address: AddressResponse,
}

impl From<Address> for AddressEnvelope {
    fn from(address: Address) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAddressRequest {
    pub full_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreateAddressRequest> for NewAddress {
    fn from(request: CreateAddressRequest) -> Self {
        NewAddress {
            full_name: request.full_name,
            phone: request.phone,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
            is_default: request.is_default,
        }
    }
}

/// Update Address Request; absent fields are left unchanged and `null` clears an
/// optional field.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateAddressRequest {
    pub full_name: Option<String>,

    #[serde(deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub phone: Option<Option<String>>,

    pub address_line1: Option<String>,

    #[serde(deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub address_line2: Option<Option<String>>,

    pub city: Option<String>,

    #[serde(deserialize_with = "present")]
    #[salvo(schema(value_type = Option<String>))]
    pub state: Option<Option<String>>,

    pub postal_code: Option<String>,
    pub country: Option<String>,

    /// `true` unsets the default flag on every other address first
    pub is_default: Option<bool>,
}

impl From<UpdateAddressRequest> for AddressUpdate {
    fn from(request: UpdateAddressRequest) -> Self {
        AddressUpdate {
            full_name: request.full_name,
            phone: request.phone,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            state: request.state,
            postal_code: request.postal_code,
            country: request.country,
            is_default: request.is_default,
        }
    }
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn null_clears_and_absent_keeps() -> TestResult {
        let request: UpdateAddressRequest =
            serde_json::from_value(json!({ "phone": null, "state": "Lagos" }))?;
        let update = AddressUpdate::from(request);

        assert_eq!(update.phone, Some(None), "null clears the phone");
        assert_eq!(update.state, Some(Some("Lagos".to_string())));
        assert_eq!(update.address_line2, None, "absent field is left unchanged");

        Ok(())
    }
}
