use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::MessageService;
use crate::errors::EduSyncError;
use crate::models::messages::{entities::Message, requests::SendMessageRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::current_user;
use crate::storage::Storage;

/// 私信被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRejection {
    MissingRecipient,
    EmptyContent,
    SelfRecipient,
}

impl MessageRejection {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            MessageRejection::MissingRecipient => ErrorCode::RecipientRequired,
            MessageRejection::EmptyContent => ErrorCode::EmptyMessageContent,
            MessageRejection::SelfRecipient => ErrorCode::SelfMessage,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MessageRejection::MissingRecipient => "请选择收件人",
            MessageRejection::EmptyContent => "消息内容不能为空",
            MessageRejection::SelfRecipient => "不能给自己发送私信",
        }
    }
}

/// 发送失败
#[derive(Debug)]
pub enum SendFailure {
    Rejected(MessageRejection),
    RecipientNotFound(i64),
    Storage(EduSyncError),
}

impl SendFailure {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SendFailure::Rejected(rejection) => rejection.error_code(),
            SendFailure::RecipientNotFound(_) => ErrorCode::RecipientNotFound,
            SendFailure::Storage(_) => ErrorCode::InternalServerError,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SendFailure::Rejected(rejection) => rejection.message().to_string(),
            SendFailure::RecipientNotFound(id) => format!("收件人 {id} 不存在"),
            SendFailure::Storage(e) => format!("发送私信失败: {e}"),
        }
    }
}

/// 校验待发送的私信，返回 (收件人, 去除首尾空白后的内容)
pub fn validate_outgoing(
    sender_id: i64,
    recipient_id: Option<i64>,
    content: Option<&str>,
) -> Result<(i64, String), MessageRejection> {
    let recipient_id = recipient_id
        .filter(|id| *id > 0)
        .ok_or(MessageRejection::MissingRecipient)?;

    let content = content.map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(MessageRejection::EmptyContent);
    }

    if recipient_id == sender_id {
        return Err(MessageRejection::SelfRecipient);
    }

    Ok((recipient_id, content.to_string()))
}

/// 校验并持久化一条私信
///
/// HTTP 与 WebSocket 共用，校验失败时不写入任何数据。
pub async fn send_message(
    storage: &dyn Storage,
    sender_id: i64,
    recipient_id: Option<i64>,
    content: Option<&str>,
) -> Result<Message, SendFailure> {
    let (recipient_id, content) =
        validate_outgoing(sender_id, recipient_id, content).map_err(SendFailure::Rejected)?;

    match storage.get_user_by_id(recipient_id).await {
        Ok(Some(recipient)) if recipient.is_active => {}
        Ok(_) => return Err(SendFailure::RecipientNotFound(recipient_id)),
        Err(e) => return Err(SendFailure::Storage(e)),
    }

    storage
        .create_message(sender_id, recipient_id, &content)
        .await
        .map_err(SendFailure::Storage)
}

pub async fn send_handler(
    service: &MessageService,
    request: &HttpRequest,
    body: SendMessageRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let sender = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    match send_message(
        storage.as_ref(),
        sender.id,
        body.recipient_id,
        body.content.as_deref(),
    )
    .await
    {
        Ok(message) => {
            // 在线时同步推送给双方
            if let Some(router) = service.get_router(request) {
                let delivered = router.deliver_message(&message);
                debug!("私信 {} 已推送到 {} 个连接", message.id, delivered);
            }
            Ok(HttpResponse::Created().json(ApiResponse::success(message, "发送成功")))
        }
        Err(failure) => {
            let body = ApiResponse::error_empty(failure.error_code(), failure.message());
            Ok(match failure {
                SendFailure::Rejected(_) => HttpResponse::BadRequest().json(body),
                SendFailure::RecipientNotFound(_) => HttpResponse::NotFound().json(body),
                SendFailure::Storage(ref e) => {
                    error!("发送私信失败: {}", e);
                    HttpResponse::InternalServerError().json(body)
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures::{self, Fixture};

    #[test]
    fn test_validate_outgoing() {
        assert_eq!(
            validate_outgoing(1, Some(2), Some("  hello  ")),
            Ok((2, "hello".to_string()))
        );
        assert_eq!(
            validate_outgoing(1, None, Some("hello")),
            Err(MessageRejection::MissingRecipient)
        );
        assert_eq!(
            validate_outgoing(1, Some(0), Some("hello")),
            Err(MessageRejection::MissingRecipient)
        );
        assert_eq!(
            validate_outgoing(1, Some(2), Some("   ")),
            Err(MessageRejection::EmptyContent)
        );
        assert_eq!(
            validate_outgoing(1, Some(2), None),
            Err(MessageRejection::EmptyContent)
        );
        assert_eq!(
            validate_outgoing(1, Some(1), Some("me")),
            Err(MessageRejection::SelfRecipient)
        );
    }

    #[test]
    fn test_rejections_have_distinct_codes() {
        let codes = [
            MessageRejection::MissingRecipient.error_code(),
            MessageRejection::EmptyContent.error_code(),
            MessageRejection::SelfRecipient.error_code(),
            SendFailure::RecipientNotFound(1).error_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[tokio::test]
    async fn test_offline_recipient_still_gets_unread_message() {
        let Fixture {
            storage,
            teacher,
            parent,
            ..
        } = fixtures::school().await;

        let before = storage.count_unread_messages(parent.id).await.unwrap();
        let message = send_message(&storage, teacher.id, Some(parent.id), Some(" hi "))
            .await
            .unwrap();
        assert_eq!(message.content, "hi");
        assert!(!message.is_read);
        assert_eq!(
            storage.count_unread_messages(parent.id).await.unwrap(),
            before + 1
        );
    }

    #[tokio::test]
    async fn test_rejected_message_is_not_persisted() {
        let Fixture {
            storage,
            teacher,
            parent,
            ..
        } = fixtures::school().await;

        let failure = send_message(&storage, teacher.id, Some(parent.id), Some(""))
            .await
            .unwrap_err();
        assert_eq!(failure.error_code(), ErrorCode::EmptyMessageContent);

        let missing = send_message(&storage, teacher.id, Some(9999), Some("hello"))
            .await
            .unwrap_err();
        assert_eq!(missing.error_code(), ErrorCode::RecipientNotFound);

        assert!(
            storage
                .list_conversation(teacher.id, parent.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_concurrent_sends_are_all_kept() {
        let Fixture {
            storage,
            admin,
            teacher,
            parent,
            ..
        } = fixtures::school().await;

        let (a, b, c) = tokio::join!(
            send_message(&storage, teacher.id, Some(parent.id), Some("one")),
            send_message(&storage, admin.id, Some(parent.id), Some("two")),
            send_message(&storage, teacher.id, Some(parent.id), Some("three")),
        );
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(a.id != b.id && b.id != c.id && a.id != c.id);

        assert_eq!(storage.count_unread_messages(parent.id).await.unwrap(), 3);

        let conversation = storage.list_conversation(parent.id, teacher.id).await.unwrap();
        assert_eq!(conversation.len(), 2);
        // 同一时刻到达的消息按 id 排序，不会丢失
        assert!(conversation[0].id < conversation[1].id);
    }
}
