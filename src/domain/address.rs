//! Mailing address records

use crate::domain::entity::{require, Collection, Entity};
use crate::domain::ids::AddressId;
use crate::domain::Result;
use serde::{Deserialize, Serialize};

/// Mailing address owned by exactly one patient or physician
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    pub street: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl Address {
    /// Creates an unsaved address, trimming surrounding whitespace
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        province: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            street: street.into().trim().to_string(),
            city: city.into().trim().to_string(),
            province: province.into().trim().to_string(),
            postal_code: postal_code.into().trim().to_string(),
        }
    }
}

impl Entity for Address {
    const COLLECTION: Collection = Collection::Addresses;
    const KIND: &'static str = "Address";

    fn validate(&self) -> Result<()> {
        require(Self::KIND, "street", &self.street)?;
        require(Self::KIND, "city", &self.city)?;
        require(Self::KIND, "province", &self.province)?;
        require(Self::KIND, "postalCode", &self.postal_code)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_fields() {
        let address = Address::new(" 1 Main Rd ", "Cape Town", "Western Cape", " 8001");
        assert_eq!(address.street, "1 Main Rd");
        assert_eq!(address.postal_code, "8001");
        assert!(address.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_postal_code() {
        let address = Address::new("1 Main Rd", "Cape Town", "Western Cape", "");
        let err = address.validate().unwrap_err();
        assert!(err.to_string().contains("Address.postalCode is required"));
    }

    #[test]
    fn test_serializes_camel_case_without_id() {
        let address = Address::new("1 Main Rd", "Cape Town", "Western Cape", "8001");
        let doc = mongodb::bson::to_document(&address).unwrap();
        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("postalCode").unwrap(), "8001");
    }
}
