//! Wire-facing layer: framing codec, per-socket connection handling,
//! and the action dispatcher.

pub mod connection;
pub mod dispatcher;
pub mod protocol;

pub use connection::Connection;
pub use dispatcher::Dispatcher;
pub use protocol::{
    ActionType, BasicResponse, ErrorResponse, GameSessionData, ItemRequest, LoginRequest,
    ProtocolError, ProtocolRequest, ProtocolResponse, RequestData, ResponseData,
};
