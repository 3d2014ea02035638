use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessageService;
use crate::models::ApiResponse;
use crate::models::messages::responses::{ContactEntry, ContactListResponse};
use crate::models::users::responses::UserBrief;
use crate::services::access::{current_user, internal_error};

/// 联系人列表，附带每个联系人发来的未读条数
pub async fn list_contacts(
    service: &MessageService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let users = match storage.list_active_users_except(user.id).await {
        Ok(users) => users,
        Err(e) => return Ok(internal_error("查询联系人失败", e)),
    };
    let unread = match storage.count_unread_by_sender(user.id).await {
        Ok(unread) => unread,
        Err(e) => return Ok(internal_error("统计未读私信失败", e)),
    };

    let items = users
        .iter()
        .map(|contact| ContactEntry {
            user: UserBrief::from(contact),
            unread_count: unread.get(&contact.id).copied().unwrap_or(0),
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ContactListResponse { items },
        "查询成功",
    )))
}
