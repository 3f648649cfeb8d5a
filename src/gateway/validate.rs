//! Path parameter validation
//!
//! Parameters are rejected, never rewritten: a request either passes as-is or
//! gets a 400 listing every failed check.

use axum::extract::path::ErrorKind;
use axum::extract::rejection::PathRejection;
use serde::Serialize;

use crate::resolve::types::{InvalidVersion, check_version};

/// Maximum length of a flavour identifier
pub const MAX_FLAVOUR_LEN: usize = 15;

/// One failed check on one parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamError {
    pub param: &'static str,
    pub msg: String,
    pub value: String,
}

/// Body of a 400 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<ParamError>,
}

impl ValidationErrors {
    pub fn from_version_error(error: InvalidVersion, version: &str) -> Self {
        Self {
            errors: vec![version_error(error, version)],
        }
    }

    /// Report path parameters the router could not extract at all
    ///
    /// The raw value is not echoed back since it is not valid UTF-8.
    pub fn from_path_rejection(rejection: &PathRejection) -> Self {
        let param = match rejection {
            PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
                ErrorKind::InvalidUtf8InPathParam { key } => param_name(key),
                _ => "path",
            },
            _ => "path",
        };
        Self {
            errors: vec![ParamError {
                param,
                msg: rejection.body_text(),
                value: String::new(),
            }],
        }
    }
}

fn param_name(key: &str) -> &'static str {
    match key {
        "flavour" => "flavour",
        "version" => "version",
        _ => "path",
    }
}

/// Validate the `flavour` and `version` path parameters together
pub fn validate_params(flavour: &str, version: &str) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    if let Err(msg) = check_flavour(flavour) {
        errors.push(ParamError {
            param: "flavour",
            msg,
            value: flavour.to_string(),
        });
    }

    if let Err(e) = check_version(version) {
        errors.push(version_error(e, version));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors { errors })
    }
}

fn version_error(error: InvalidVersion, version: &str) -> ParamError {
    ParamError {
        param: "version",
        msg: error.to_string(),
        value: version.to_string(),
    }
}

fn check_flavour(flavour: &str) -> Result<(), String> {
    if flavour.is_empty() {
        return Err("flavour must not be empty".to_string());
    }
    if !flavour.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("flavour must contain only letters".to_string());
    }
    if flavour.len() > MAX_FLAVOUR_LEN {
        return Err(format!(
            "flavour must be at most {MAX_FLAVOUR_LEN} characters"
        ));
    }
    Ok(())
}
