//! Endpoint handlers, one module per resource

pub mod avatars;
pub mod health;
pub mod patients;
pub mod physicians;
pub mod requisitions;

use crate::api::error::ApiError;
use crate::api::form::FormData;
use crate::domain::Address;

/// Reads the address fields shared by the patient and physician forms
pub(crate) fn address_from(form: &FormData) -> Result<Address, ApiError> {
    Ok(Address::new(
        form.require("street")?,
        form.require("city")?,
        form.require("province")?,
        form.require("postalCode")?,
    ))
}
