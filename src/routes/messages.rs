use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messages::requests::SendMessageRequest;
use crate::services::MessageService;
use crate::utils::SafeUserIdI64;

// 懒加载的全局 MessageService 实例
static MESSAGE_SERVICE: Lazy<MessageService> = Lazy::new(MessageService::new_lazy);

pub async fn list_contacts(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.list_contacts(&req).await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.unread_count(&req).await
}

pub async fn send_message(
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.send(&req, body.into_inner()).await
}

// 打开与某用户的会话，并将对方发来的消息标记为已读
pub async fn conversation(req: HttpRequest, user_id: SafeUserIdI64) -> ActixResult<HttpResponse> {
    MESSAGE_SERVICE.conversation(&req, user_id.0).await
}

// 配置路由
pub fn configure_messages_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(send_message))
            .route("/contacts", web::get().to(list_contacts))
            .route("/unread", web::get().to(unread_count))
            .route("/{user_id}", web::get().to(conversation)),
    );
}
