//! Forms Module - Contact form validation and submission
//!
//! Validation is a seam: [`FormValidator`] takes the submitted fields and
//! either accepts them or rejects the form with a reason. [`RequiredFields`]
//! is the page's own rule, every field must be non-blank.
//!
//! # Example
//!
//! ```ignore
//! use spark_page::state::forms::{self, FieldMap, RequiredFields};
//!
//! let mut fields = FieldMap::new();
//! fields.insert("email".into(), "pi@lab.example".into());
//! forms::submit(&RequiredFields, &notifier, fields)?;
//! ```

use std::collections::BTreeMap;

use super::notify::{NotificationKind, Notifier};
use crate::error::{PageError, Result};

/// Field name to submitted value.
pub type FieldMap = BTreeMap<String, String>;

pub const SUBMITTED_MESSAGE: &str = "Thank you for your message! We will get back to you soon.";
pub const INCOMPLETE_MESSAGE: &str = "Please fill in all fields.";

/// Accepts or rejects a submitted form.
pub trait FormValidator {
    fn validate(&self, fields: FieldMap) -> Result<FieldMap>;
}

/// Every field must hold something other than whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields;

impl RequiredFields {
    /// Names of the blank fields, in name order.
    pub fn blank(fields: &FieldMap) -> Vec<&str> {
        fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

impl FormValidator for RequiredFields {
    fn validate(&self, fields: FieldMap) -> Result<FieldMap> {
        let blank = Self::blank(&fields);
        if blank.is_empty() {
            Ok(fields)
        } else {
            Err(PageError::Rejected(format!("blank fields: {}", blank.join(", "))))
        }
    }
}

/// Validate and hand off a form, notifying the user either way.
pub fn submit(
    validator: &dyn FormValidator,
    notifier: &dyn Notifier,
    fields: FieldMap,
) -> Result<FieldMap> {
    match validator.validate(fields) {
        Ok(fields) => {
            tracing::info!(fields = fields.len(), "form submitted");
            notifier.notify(SUBMITTED_MESSAGE, NotificationKind::Success);
            Ok(fields)
        }
        Err(err) => {
            tracing::debug!(%err, "form rejected");
            notifier.notify(INCOMPLETE_MESSAGE, NotificationKind::Error);
            Err(err)
        }
    }
}
