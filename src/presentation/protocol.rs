//! Wire protocol: framing codec and message types.
//!
//! A frame is `HEADER_SIZE` ASCII digits (left-justified, space-padded)
//! giving the length of the encoded payload, the literal tag `HEADER`,
//! then the payload itself: JSON, base64-encoded so no control byte ever
//! appears on the stream. Identifiers travel as hex text and currency as
//! decimal text, so both round-trip exactly.
//!
//! The 10-digit length field caps an encoded payload just under 10 GB;
//! that is the hard ceiling of the format and far beyond any realistic
//! catalog listing.

use crate::application::SessionSnapshot;
use crate::domain::{
    AccountId, ErrorDetail, GameError, ItemId, Nickname, SessionToken, ShopItem,
};
use base64::prelude::{Engine, BASE64_STANDARD};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the ASCII length field.
pub const HEADER_SIZE: usize = 10;
/// Fixed tag literal following the length field.
pub const HEADER_TAG: &[u8] = b"HEADER";
/// Length field plus tag.
pub const HEADER_TOTAL_SIZE: usize = HEADER_SIZE + HEADER_TAG.len();
/// Socket read granularity used by the connection loop.
pub const CHUNK_SIZE: usize = 64;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is not valid base64: {0}")]
    Transport(#[from] base64::DecodeError),
}

/// Encode a payload into a complete frame: header, tag, encoded body.
pub fn construct<T: Serialize>(payload: &T) -> Result<Vec<u8>, ProtocolError> {
    let json = serde_json::to_vec(payload)?;
    let encoded = BASE64_STANDARD.encode(json);

    let mut frame = format!("{:<width$}", encoded.len(), width = HEADER_SIZE).into_bytes();
    frame.extend_from_slice(HEADER_TAG);
    frame.extend_from_slice(encoded.as_bytes());
    Ok(frame)
}

/// Decode a transport-encoded payload (header and tag already stripped).
/// Exact inverse of [`construct`]'s encoding step.
pub fn parse<T: DeserializeOwned>(payload: &[u8]) -> Result<T, ProtocolError> {
    let json = BASE64_STANDARD.decode(payload)?;
    Ok(serde_json::from_slice(&json)?)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Action kind requested by the client. An unrecognized string is kept
/// verbatim so the dispatcher can answer `UnknownActionType` instead of
/// the codec rejecting the whole frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    GetAllItemList,
    GetGameDataSession,
    Login,
    Logout,
    BuyItem,
    SellItem,
    Unknown(String),
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "get_all_item_list" => ActionType::GetAllItemList,
            "get_game_data_session" => ActionType::GetGameDataSession,
            "login" => ActionType::Login,
            "logout" => ActionType::Logout,
            "buy_item" => ActionType::BuyItem,
            "sell_item" => ActionType::SellItem,
            _ => ActionType::Unknown(value),
        }
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::GetAllItemList => "get_all_item_list".to_string(),
            ActionType::GetGameDataSession => "get_game_data_session".to_string(),
            ActionType::Login => "login".to_string(),
            ActionType::Logout => "logout".to_string(),
            ActionType::BuyItem => "buy_item".to_string(),
            ActionType::SellItem => "sell_item".to_string(),
            ActionType::Unknown(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub nickname: Nickname,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub item_uuid: ItemId,
}

/// Action-dependent request payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestData {
    Item(ItemRequest),
    Login(LoginRequest),
}

/// One request frame as decoded off the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolRequest {
    pub action_type: ActionType,
    pub session_uuid: Option<SessionToken>,
    pub data: Option<RequestData>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicResponse {
    pub status: String,
}

impl BasicResponse {
    pub fn ok() -> Self {
        BasicResponse {
            status: "ok".to_string(),
        }
    }
}

/// Full session snapshot returned by login and session-data requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSessionData {
    pub account_uuid: AccountId,
    pub nickname: Nickname,
    pub balance: Decimal,
    pub session_uuid: SessionToken,
    pub owned_items: Vec<ShopItem>,
}

impl From<SessionSnapshot> for GameSessionData {
    fn from(snapshot: SessionSnapshot) -> Self {
        GameSessionData {
            account_uuid: snapshot.account.id,
            nickname: snapshot.account.nickname,
            balance: snapshot.balance,
            session_uuid: snapshot.session_token,
            owned_items: snapshot.owned_items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub message: String,
    pub value: Option<serde_json::Value>,
}

impl From<&GameError> for ErrorResponse {
    fn from(error: &GameError) -> Self {
        let value = error.detail().map(|detail| match detail {
            ErrorDetail::Text(text) => serde_json::Value::String(text),
            ErrorDetail::Amount(amount) => serde_json::Value::String(amount.to_string()),
        });
        ErrorResponse {
            error_code: error.code(),
            message: error.to_string(),
            value,
        }
    }
}

impl From<GameError> for ErrorResponse {
    fn from(error: GameError) -> Self {
        ErrorResponse::from(&error)
    }
}

/// Response payload: exactly one of snapshot, status, item list, error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Session(GameSessionData),
    Items(Vec<ShopItem>),
    Error(ErrorResponse),
    Status(BasicResponse),
}

/// One response frame as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolResponse {
    pub data: ResponseData,
}

impl ProtocolResponse {
    pub fn error(error: &GameError) -> Self {
        ProtocolResponse {
            data: ResponseData::Error(ErrorResponse::from(error)),
        }
    }
}
