//! Unified error codes for the fulfillment stack
//!
//! This module defines all error codes used across the server and frontend.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order and transition errors
//! - 5xxx: Ledger errors
//! - 6xxx: Numbering and quote errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order / Transition ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Target status is not a known pipeline state
    UnknownStatus = 4002,
    /// Order already has a transition in flight
    TransitionInFlight = 4003,
    /// Stored status no longer matches the transition's origin
    TransitionConflict = 4004,
    /// Collection ticket not found or already resolved
    TicketNotFound = 4005,
    /// Skip is only valid for the tracking collection step
    SkipNotAllowed = 4006,
    /// Expense amount is required to enter production
    ExpenseAmountRequired = 4007,
    /// Tracking code is required (or the step must be skipped)
    TrackingCodeRequired = 4008,

    // ==================== 5xxx: Ledger ====================
    /// Ledger entry not found
    TransactionNotFound = 5001,
    /// Amount must be a positive number
    AmountNotPositive = 5002,

    // ==================== 6xxx: Numbering / Quote ====================
    /// Two document creations drew the same number
    NumberingCollision = 6001,
    /// Quote not found
    QuoteNotFound = 6101,
    /// Quote has already been converted
    QuoteAlreadyConverted = 6102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order / Transition
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::UnknownStatus => "Unknown pipeline status",
            ErrorCode::TransitionInFlight => "Order already has a transition in flight",
            ErrorCode::TransitionConflict => "Order status changed since the move started",
            ErrorCode::TicketNotFound => "Collection ticket not found or already resolved",
            ErrorCode::SkipNotAllowed => "Only the tracking step can be skipped",
            ErrorCode::ExpenseAmountRequired => "Expense amount is required to enter production",
            ErrorCode::TrackingCodeRequired => "Tracking code is required",

            // Ledger
            ErrorCode::TransactionNotFound => "Ledger entry not found",
            ErrorCode::AmountNotPositive => "Amount must be a positive number",

            // Numbering / Quote
            ErrorCode::NumberingCollision => "Document number already taken",
            ErrorCode::QuoteNotFound => "Quote not found",
            ErrorCode::QuoteAlreadyConverted => "Quote has already been converted",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order / Transition
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::UnknownStatus),
            4003 => Ok(ErrorCode::TransitionInFlight),
            4004 => Ok(ErrorCode::TransitionConflict),
            4005 => Ok(ErrorCode::TicketNotFound),
            4006 => Ok(ErrorCode::SkipNotAllowed),
            4007 => Ok(ErrorCode::ExpenseAmountRequired),
            4008 => Ok(ErrorCode::TrackingCodeRequired),

            // Ledger
            5001 => Ok(ErrorCode::TransactionNotFound),
            5002 => Ok(ErrorCode::AmountNotPositive),

            // Numbering / Quote
            6001 => Ok(ErrorCode::NumberingCollision),
            6101 => Ok(ErrorCode::QuoteNotFound),
            6102 => Ok(ErrorCode::QuoteAlreadyConverted),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
