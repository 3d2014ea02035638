use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::MessageService;
use crate::models::messages::responses::ConversationResponse;
use crate::models::users::responses::UserBrief;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

/// 打开与某用户的会话
///
/// 两步完成：先读取会话，再把本次读到的、对方发给自己的未读消息标记为已读。
/// 标记以本次读到的最大 id 为上界，读取之后才到达的消息保持未读。
pub async fn open_conversation(
    service: &MessageService,
    request: &HttpRequest,
    partner_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let reader = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let partner = match storage.get_user_by_id(partner_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "会话对象不存在",
            )));
        }
        Err(e) => return Ok(internal_error("查询用户失败", e)),
    };

    let messages = match storage.list_conversation(reader.id, partner.id).await {
        Ok(messages) => messages,
        Err(e) => return Ok(internal_error("查询会话失败", e)),
    };

    let marked_read = match messages.iter().map(|m| m.id).max() {
        Some(up_to_id) => match storage
            .mark_messages_read(reader.id, partner.id, up_to_id)
            .await
        {
            Ok(count) => count,
            Err(e) => return Ok(internal_error("标记已读失败", e)),
        },
        None => 0,
    };
    debug!(
        "用户 {} 打开与 {} 的会话，标记已读 {} 条",
        reader.id, partner.id, marked_read
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ConversationResponse {
            partner: UserBrief::from(&partner),
            messages,
            marked_read,
        },
        "查询成功",
    )))
}
