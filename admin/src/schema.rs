//! Order validation schema.
//!
//! Declarative rules live on [`OrderDraft`] as `validator` attributes; the
//! integer constraint on the numeric fields is checked here because the draft
//! keeps raw (possibly fractional) numbers. A draft that passes becomes a typed
//! [`CreateOrderRequest`]. The remote service may still reject it.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

use crate::models::order::{CreateOrderRequest, OrderDraft, OrderField};

/// Field-scoped validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msgs)| format!("{}: {}", field, msgs.join(", ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<ValidationErrors> for FieldErrors {
    fn from(e: ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errors) in e.field_errors() {
            for err in errors.iter() {
                let message = match &err.message {
                    Some(m) => m.to_string(),
                    None => format!("{} is invalid ({})", field, err.code),
                };
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field: {0}")]
pub struct UnknownField(pub String);

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
fn fits_i64(value: f64) -> bool {
    value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Runs every rule against the draft and returns the create payload.
pub fn validate_order(draft: &OrderDraft) -> Result<CreateOrderRequest, FieldErrors> {
    let mut errors = match draft.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(e),
    };

    for (field, value) in draft.numeric_fields() {
        if !is_integer(value) {
            errors.add(field.name(), format!("{} must be an integer", field.name()));
        } else if !fits_i64(value) {
            errors.add(field.name(), format!("{} is out of range", field.name()));
        }
    }

    let delivery_date = draft.delivery_date;
    let company_id = draft.company_id.clone().filter(|id| !id.is_empty());

    match (delivery_date, company_id) {
        (Some(date), Some(company_id)) if errors.is_empty() => Ok(CreateOrderRequest {
            customer_name: draft.customer_name.clone(),
            product_category: draft.product_category.clone(),
            size: draft.size as i64,
            length: draft.length as i64,
            weight: draft.weight as i64,
            purity: draft.purity as i64,
            screw_type: draft.screw_type.clone(),
            rhodium_details: draft.rhodium_details.clone(),
            delivery_date: date.midnight().assume_utc(),
            company_id,
        }),
        (date, company_id) => {
            // usually already reported by required()
            if date.is_none() && errors.get(OrderField::DeliveryDate.name()).is_none() {
                errors.add(
                    OrderField::DeliveryDate.name(),
                    "delivery_date is a required field",
                );
            }
            if company_id.is_none() && errors.get(OrderField::CompanyId.name()).is_none() {
                errors.add(OrderField::CompanyId.name(), "company_id is a required field");
            }
            Err(errors)
        }
    }
}
