mod contacts;
mod conversation;
mod send;
mod unread;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::messages::requests::SendMessageRequest;
use crate::services::websocket::PresenceRouter;
use crate::storage::Storage;

pub use send::{MessageRejection, SendFailure, send_message, validate_outgoing};

pub struct MessageService {
    storage: Option<Arc<dyn Storage>>,
}

impl MessageService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    /// 实时路由（未注册时不推送）
    pub(crate) fn get_router(&self, request: &HttpRequest) -> Option<Arc<PresenceRouter>> {
        request
            .app_data::<actix_web::web::Data<Arc<PresenceRouter>>>()
            .map(|data| data.get_ref().clone())
    }

    // 联系人列表
    pub async fn list_contacts(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        contacts::list_contacts(self, request).await
    }

    // 未读私信数
    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        unread::unread_count(self, request).await
    }

    // 发送私信
    pub async fn send(
        &self,
        request: &HttpRequest,
        body: SendMessageRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_handler(self, request, body).await
    }

    // 打开会话（读取后标记已读）
    pub async fn conversation(
        &self,
        request: &HttpRequest,
        partner_id: i64,
    ) -> ActixResult<HttpResponse> {
        conversation::open_conversation(self, request, partner_id).await
    }
}
