use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessageService;
use crate::models::ApiResponse;
use crate::models::messages::responses::UnreadCountResponse;
use crate::services::access::{current_user, internal_error};

pub async fn unread_count(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match storage.count_unread_messages(user.id).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse {
                unread_count: count,
            },
            "查询成功",
        ))),
        Err(e) => Ok(internal_error("查询未读私信数量失败", e)),
    }
}
