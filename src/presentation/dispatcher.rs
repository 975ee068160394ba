//! Session/action dispatcher: routes a decoded request to its handler
//! and converts every domain error into an error response at this
//! boundary. A handler failure never closes the connection.

use crate::application::ports::GameStore;
use crate::application::use_cases;
use crate::application::StartingBalanceRange;
use crate::domain::GameError;
use crate::presentation::protocol::{
    ActionType, BasicResponse, GameSessionData, ProtocolRequest, ProtocolResponse, RequestData,
    ResponseData,
};
use std::sync::Arc;

pub struct Dispatcher {
    store: Arc<dyn GameStore>,
    starting_balance: StartingBalanceRange,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn GameStore>, starting_balance: StartingBalanceRange) -> Self {
        Dispatcher {
            store,
            starting_balance,
        }
    }

    /// Route a request and always produce a well-typed response frame.
    pub async fn dispatch(&self, request: ProtocolRequest) -> ProtocolResponse {
        tracing::debug!(action = ?request.action_type, "dispatching action");
        match self.route(request).await {
            Ok(data) => ProtocolResponse { data },
            Err(error) => {
                tracing::debug!(code = error.code(), %error, "action failed");
                ProtocolResponse::error(&error)
            }
        }
    }

    async fn route(&self, request: ProtocolRequest) -> Result<ResponseData, GameError> {
        let store = self.store.as_ref();
        match request.action_type {
            ActionType::Login => {
                let Some(RequestData::Login(login)) = request.data else {
                    return Err(GameError::BadRequest);
                };
                let snapshot =
                    use_cases::login(store, self.starting_balance, login.nickname).await?;
                Ok(ResponseData::Session(GameSessionData::from(snapshot)))
            }
            ActionType::Logout => {
                let token = request.session_uuid.ok_or(GameError::Unauthorized)?;
                use_cases::logout(store, token).await?;
                Ok(ResponseData::Status(BasicResponse::ok()))
            }
            ActionType::GetGameDataSession => {
                let token = request.session_uuid.ok_or(GameError::Unauthorized)?;
                let snapshot = use_cases::game_data(store, token).await?;
                Ok(ResponseData::Session(GameSessionData::from(snapshot)))
            }
            ActionType::GetAllItemList => {
                Ok(ResponseData::Items(use_cases::list_catalog(store).await))
            }
            ActionType::BuyItem => {
                let token = request.session_uuid.ok_or(GameError::Unauthorized)?;
                let Some(RequestData::Item(item)) = request.data else {
                    return Err(GameError::BadRequest);
                };
                use_cases::buy_item(store, token, item.item_uuid).await?;
                Ok(ResponseData::Status(BasicResponse::ok()))
            }
            ActionType::SellItem => {
                let token = request.session_uuid.ok_or(GameError::Unauthorized)?;
                let Some(RequestData::Item(item)) = request.data else {
                    return Err(GameError::BadRequest);
                };
                use_cases::sell_item(store, token, item.item_uuid).await?;
                Ok(ResponseData::Status(BasicResponse::ok()))
            }
            ActionType::Unknown(kind) => {
                tracing::warn!(%kind, "unknown action type");
                Err(GameError::UnknownActionType)
            }
        }
    }
}
