//! Field-level validation of subscription requests.
//!
//! Each rule is a pure function returning a [`ValidationError`]; the
//! [`Validate`] impls compose them per DTO. Nothing here holds state, so the
//! rules can be called from any task without a shared validator instance.

use std::borrow::Cow;

use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::month_year::{self, MonthYear};
use crate::subscription::{
    CreateSubscription, NewSubscription, SubscriptionPatch, UpdateSubscription,
    MAX_SERVICE_NAME_LENGTH,
};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn violation(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Service name must be 1-255 characters.
pub fn validate_service_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SERVICE_NAME_LENGTH {
        return Err(violation(
            "length",
            format!("must be between 1 and {MAX_SERVICE_NAME_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

/// Price must be strictly positive.
pub fn validate_price(price: i64) -> Result<(), ValidationError> {
    if price <= 0 {
        return Err(violation(
            "range",
            format!("must be greater than 0 (got {price})"),
        ));
    }
    Ok(())
}

/// User id must be a hyphenated UUID (`8-4-4-4-12` hex groups).
pub fn validate_user_id(user_id: &str) -> Result<(), ValidationError> {
    if user_id.len() != 36 || uuid::Uuid::parse_str(user_id).is_err() {
        return Err(violation("uuid", "must be a valid UUID"));
    }
    Ok(())
}

/// Strict `MM-YYYY`; the empty string fails.
pub fn validate_month_year(value: &str) -> Result<(), ValidationError> {
    if !month_year::is_valid(value) {
        return Err(violation("month_year", "must be in MM-YYYY format"));
    }
    Ok(())
}

/// `MM-YYYY` or empty, where empty means the field was not supplied.
pub fn validate_optional_month_year(value: &str) -> Result<(), ValidationError> {
    if !month_year::is_blank_or_valid(value) {
        return Err(violation("month_year", "must be in MM-YYYY format"));
    }
    Ok(())
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(violation("required", "is required"));
    }
    Ok(())
}

fn check(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<(), ValidationError>,
) {
    if let Err(err) = result {
        errors.add(field, err);
    }
}

fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// ---------------------------------------------------------------------------
// DTO validation
// ---------------------------------------------------------------------------

impl Validate for CreateSubscription {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check(
            &mut errors,
            "service_name",
            required(&self.service_name).and_then(|()| validate_service_name(&self.service_name)),
        );
        check(&mut errors, "price", validate_price(self.price));
        check(
            &mut errors,
            "user_id",
            required(&self.user_id).and_then(|()| validate_user_id(&self.user_id)),
        );
        check(
            &mut errors,
            "start_date",
            required(&self.start_date).and_then(|()| validate_month_year(&self.start_date)),
        );
        if let Some(end_date) = &self.end_date {
            check(&mut errors, "end_date", validate_optional_month_year(end_date));
        }

        finish(errors)
    }
}

impl Validate for UpdateSubscription {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(name) = &self.service_name {
            check(&mut errors, "service_name", validate_service_name(name));
        }
        if let Some(price) = self.price {
            check(&mut errors, "price", validate_price(price));
        }
        if let Some(user_id) = &self.user_id {
            check(&mut errors, "user_id", validate_user_id(user_id));
        }
        if let Some(start_date) = &self.start_date {
            check(&mut errors, "start_date", validate_month_year(start_date));
        }
        if let Some(Some(end_date)) = &self.end_date {
            check(&mut errors, "end_date", validate_optional_month_year(end_date));
        }

        finish(errors)
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let parts: Vec<String> = fields
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let message: &str = match &err.message {
                        Some(message) => &**message,
                        None => &*err.code,
                    };
                    format!("{field}: {message}")
                })
            })
            .collect();

        CoreError::Validation(parts.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Parsing into typed inputs
// ---------------------------------------------------------------------------

fn parse_month_year(field: &str, value: &str) -> Result<MonthYear, CoreError> {
    MonthYear::parse(value).map_err(|e| CoreError::Validation(format!("{field}: {e}")))
}

fn parse_user_id(value: &str) -> Result<uuid::Uuid, CoreError> {
    uuid::Uuid::parse_str(value)
        .map_err(|e| CoreError::Validation(format!("user_id: {e}")))
}

/// An empty end date is the same as no end date.
fn parse_end_date(value: Option<&str>) -> Result<Option<MonthYear>, CoreError> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => parse_month_year("end_date", s).map(Some),
    }
}

/// Validate a create request and convert it into typed values.
pub fn parse_create(input: &CreateSubscription) -> Result<NewSubscription, CoreError> {
    input.validate()?;

    Ok(NewSubscription {
        service_name: input.service_name.clone(),
        price: input.price,
        user_id: parse_user_id(&input.user_id)?,
        start_date: parse_month_year("start_date", &input.start_date)?,
        end_date: parse_end_date(input.end_date.as_deref())?,
    })
}

/// Validate an update request and convert it into a typed patch.
pub fn parse_update(input: &UpdateSubscription) -> Result<SubscriptionPatch, CoreError> {
    input.validate()?;

    Ok(SubscriptionPatch {
        service_name: input.service_name.clone(),
        price: input.price,
        user_id: input.user_id.as_deref().map(parse_user_id).transpose()?,
        start_date: input
            .start_date
            .as_deref()
            .map(|s| parse_month_year("start_date", s))
            .transpose()?,
        end_date: input
            .end_date
            .as_ref()
            .map(|inner| parse_end_date(inner.as_deref()))
            .transpose()?,
    })
}
