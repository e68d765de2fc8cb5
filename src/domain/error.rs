// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Connection failed to endpoint: {0}")]
    Connection(String),

    #[error("Chain read failed: {0}")]
    ChainRead(String),

    #[error("External API error: {provider} responded with {status}")]
    ApiCall { provider: String, status: u16 },

    #[error("Validation failed for field {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Address {0} is invalid or not checksummed")]
    InvalidAddress(String),

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Failures raised by logic adapters while quoting or building.
#[derive(Error, Debug)]
pub enum LogicError {
    #[error("Field validation failed for {field}: {message}")]
    FieldValidation { field: String, message: String },

    #[error("Chain {0} is not supported by this logic")]
    UnsupportedChain(u64),

    #[error("Operation {operation} is not supported by logic {logic}")]
    UnsupportedOperation { operation: String, logic: String },

    #[error("Logic {logic} received fields for {received}")]
    FieldsMismatch { logic: String, received: String },

    #[error("Unknown logic: {0}")]
    UnknownLogic(String),

    #[error("Unknown market: {0}")]
    UnknownMarket(String),

    #[error("Address for {0} is not configured on this chain")]
    MissingAddress(&'static str),

    #[error("Chain read failed: {0}")]
    ChainRead(String),

    #[error("Allowance read failed for token {token}: {reason}")]
    AllowanceRead { token: Address, reason: String },

    #[error("Permit flow cannot {action} while {from}")]
    InvalidPermitTransition { from: &'static str, action: &'static str },

    #[error("Both input and output are native; wrap mode is ambiguous")]
    AmbiguousWrap,

    #[error(transparent)]
    App(#[from] AppError),
}

impl LogicError {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        LogicError::FieldValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
