//! Shared validation helpers for inbound HTTP adapters.
//!
//! Raw wire values become domain value types here, so handlers hand their
//! services pre-validated input and every rejection carries the same
//! `{field, code}` detail shape.

use serde_json::json;

use crate::domain::member::MemberId;
use crate::domain::promotion::{RequestId, RequestStatus, RequestType, VoteChoice};
use crate::domain::{Error, Level};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidLevel,
    InvalidRequestType,
    InvalidStatus,
    InvalidVote,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidLevel => "invalid_level",
            ErrorCode::InvalidRequestType => "invalid_request_type",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidVote => "invalid_vote",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(
    field: FieldName,
    code: ErrorCode,
    message: String,
    value: impl Into<String>,
) -> Error {
    Error::validation_error(message).with_details(json!({
        "field": field.as_str(),
        "value": value.into(),
        "code": code.as_str(),
    }))
}

/// Build a validation error for a field that failed a domain parser.
///
/// The parser's own message is surfaced so clients see the exact rule that
/// was broken.
pub(crate) fn invalid_field_error(
    field: FieldName,
    code: &'static str,
    error: impl std::fmt::Display,
) -> Error {
    Error::validation_error(error.to_string()).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn parse_member_id(value: &str, field: FieldName) -> Result<MemberId, Error> {
    value.parse::<MemberId>().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_request_id(value: &str, field: FieldName) -> Result<RequestId, Error> {
    value.parse::<RequestId>().map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
            value,
        )
    })
}

pub(crate) fn parse_level(value: u8, field: FieldName) -> Result<Level, Error> {
    Level::new(value).map_err(|error| {
        field_error(
            field,
            ErrorCode::InvalidLevel,
            error.to_string(),
            value.to_string(),
        )
    })
}

pub(crate) fn parse_request_type(value: &str, field: FieldName) -> Result<RequestType, Error> {
    match value {
        "PROMOTE" => Ok(RequestType::Promote),
        "DEMOTE" => Ok(RequestType::Demote),
        "PROMOTE_TO_5" => Ok(RequestType::PromoteToAdmin),
        "DEMOTE_FROM_5" => Ok(RequestType::DemoteFromAdmin),
        other => Err(field_error(
            field,
            ErrorCode::InvalidRequestType,
            format!(
                "{} must be one of PROMOTE, DEMOTE, PROMOTE_TO_5, DEMOTE_FROM_5",
                field.as_str()
            ),
            other,
        )),
    }
}

pub(crate) fn parse_request_status(value: &str, field: FieldName) -> Result<RequestStatus, Error> {
    match value {
        "open" => Ok(RequestStatus::Open),
        "approved" => Ok(RequestStatus::Approved),
        "rejected" => Ok(RequestStatus::Rejected),
        "expired" => Ok(RequestStatus::Expired),
        other => Err(field_error(
            field,
            ErrorCode::InvalidStatus,
            format!(
                "{} must be one of open, approved, rejected, expired",
                field.as_str()
            ),
            other,
        )),
    }
}

pub(crate) fn parse_vote_choice(value: &str, field: FieldName) -> Result<VoteChoice, Error> {
    match value {
        "for" => Ok(VoteChoice::For),
        "against" => Ok(VoteChoice::Against),
        other => Err(field_error(
            field,
            ErrorCode::InvalidVote,
            format!("{} must be either for or against", field.as_str()),
            other,
        )),
    }
}
