//! Helpers shared by the request validators.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// A validation error carrying a client-facing message.
pub(crate) fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Flattens validator output into one stable, human readable message.
///
/// Messages are sorted so the same input always yields the same text.
pub(crate) fn describe_validation(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
