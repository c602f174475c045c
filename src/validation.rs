use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles");
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Path ids that are not UUIDs are reported the same way as ids that do not
/// resolve.
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::NotFound(not_found))
}

/// Collects every failing field rule so a single 400 can report all of them.
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, ok: bool, param: &str, msg: &str) -> Self {
        if !ok {
            self.errors.push(FieldError::for_param(param, msg));
        }
        self
    }

    pub fn required(self, param: &str, value: &str, msg: &str) -> Self {
        self.check(!value.trim().is_empty(), param, msg)
    }

    pub fn present<T>(self, param: &str, value: &Option<T>, msg: &str) -> Self {
        self.check(value.is_some(), param, msg)
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}
