//! Field-level validation for warehouses and products.
//!
//! Declarative rules live on the entity models (`validator` attributes); the
//! functions here run them and add the checks the derive cannot express.

use validator::{Validate, ValidationErrors};

use crate::entities::{product, warehouse};
use crate::errors::ServiceError;

/// Flattens `errors` into one message per field, ordered by field name.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| {
                err.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code))
            })
        })
        .collect()
}

/// Checks every warehouse field constraint.
pub fn validate_warehouse(model: &warehouse::Model) -> Result<(), ServiceError> {
    model.validate().map_err(ServiceError::from)
}

/// Checks every product field constraint, including the strictly positive
/// per-unit volume.
pub fn validate_product(model: &product::Model) -> Result<(), ServiceError> {
    let mut messages = match model.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_messages(&errors),
    };

    let volume = model.volume_per_unit_m3;
    if !volume.is_finite() || volume <= 0.0 {
        messages.push("Volume per unit must be greater than 0".to_string());
    }

    if messages.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(messages))
    }
}
