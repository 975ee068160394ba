//! Domain error taxonomy with stable wire codes.
//!
//! The numeric code ranges are part of the wire contract:
//! 1000-1050 protocol, 1051-1100 account, 1101-1150 session,
//! 1151-1200 balance, 1201-1250 catalog, 1251-1300 ownership.

use rust_decimal::Decimal;
use thiserror::Error;

/// Every failure a handler can produce. Converted to an `ErrorResponse`
/// frame at the dispatcher boundary; never tears down the connection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("Bad request")]
    BadRequest,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unknown action type")]
    UnknownActionType,

    #[error("Account with this nickname already exists")]
    AccountAlreadyExists { nickname: String },

    #[error("Account doesn't exist")]
    AccountNotExist,

    #[error("Account session not found")]
    AccountSessionNotFound,

    #[error("Failed to find account balance record")]
    AccountBalanceNotFound { account: String },

    #[error("Not enough funds on account")]
    NotEnoughFunds { balance: Decimal },

    #[error("Shop item not found")]
    ShopItemNotFound { item: String },

    #[error("Account already has this item")]
    AccountAlreadyOwnsItem { item: String },

    #[error("Account doesn't have this item")]
    AccountDoesntOwnItem { item: String },
}

/// Optional detail attached to an error response (`value` on the wire).
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    Text(String),
    Amount(Decimal),
}

impl GameError {
    /// Stable wire code for this error.
    pub const fn code(&self) -> u16 {
        match self {
            GameError::BadRequest => 1000,
            GameError::Unauthorized => 1001,
            GameError::UnknownActionType => 1002,
            GameError::AccountAlreadyExists { .. } => 1051,
            GameError::AccountNotExist => 1052,
            GameError::AccountSessionNotFound => 1101,
            GameError::AccountBalanceNotFound { .. } => 1151,
            GameError::NotEnoughFunds { .. } => 1152,
            GameError::ShopItemNotFound { .. } => 1201,
            GameError::AccountAlreadyOwnsItem { .. } => 1251,
            GameError::AccountDoesntOwnItem { .. } => 1252,
        }
    }

    /// Detail value carried alongside the message, if any.
    pub fn detail(&self) -> Option<ErrorDetail> {
        match self {
            GameError::BadRequest
            | GameError::Unauthorized
            | GameError::UnknownActionType
            | GameError::AccountNotExist
            | GameError::AccountSessionNotFound => None,
            GameError::AccountAlreadyExists { nickname } => {
                Some(ErrorDetail::Text(nickname.clone()))
            }
            GameError::AccountBalanceNotFound { account } => {
                Some(ErrorDetail::Text(account.clone()))
            }
            GameError::NotEnoughFunds { balance } => Some(ErrorDetail::Amount(*balance)),
            GameError::ShopItemNotFound { item }
            | GameError::AccountAlreadyOwnsItem { item }
            | GameError::AccountDoesntOwnItem { item } => Some(ErrorDetail::Text(item.clone())),
        }
    }
}
