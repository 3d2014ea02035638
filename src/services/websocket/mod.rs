/*!
 * WebSocket 实时通道
 *
 * 私信推送与通话信令共用同一条连接。
 *
 * ## 使用方法
 *
 * 客户端通过以下 URL 连接：
 * ```text
 * ws://host/api/v1/ws?token=<access_token>
 * ```
 *
 * 未携带有效令牌的连接不加入任何房间，也不能发送私信或信令。
 *
 * ## 消息格式
 *
 * 所有帧均为带 `type` 字段的 JSON 文本：
 * ```json
 * {"type": "send_message", "recipient_id": 2, "content": "明天见"}
 * {"type": "new_message", "id": 1, "sender_id": 1, "recipient_id": 2,
 *  "content": "明天见", "timestamp": "2025-03-01T08:30:00Z"}
 * {"type": "call_offer", "to": 2, "sdp": {...}, "media": {...}}
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

pub mod events;
pub mod router;

use actix_ws::Message as WsFrame;
use futures_util::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::models::ErrorCode;
use crate::services::messages::{SendFailure, send_message};
use crate::storage::Storage;

pub use events::{ClientEvent, ServerEvent};
pub use router::{ConnectionId, JoinRejection, PresenceRouter, user_room};

/// 处理一条客户端事件，回复通过路由表推送
pub async fn dispatch(
    router: &PresenceRouter,
    storage: &dyn Storage,
    conn_id: ConnectionId,
    user_id: Option<i64>,
    event: ClientEvent,
) {
    match event {
        ClientEvent::Ping => {
            router.send_to(conn_id, ServerEvent::Pong);
        }
        ClientEvent::Join { room } => match router.join(conn_id, &room) {
            Ok(()) => {}
            Err(JoinRejection::InvalidName(reason)) => {
                router.send_to(conn_id, ServerEvent::error(ErrorCode::InvalidRoomName, reason));
            }
            Err(JoinRejection::Forbidden) => {
                router.send_to(
                    conn_id,
                    ServerEvent::error(ErrorCode::Forbidden, "不能加入其他用户的房间"),
                );
            }
            Err(JoinRejection::UnknownConnection) => {}
        },
        ClientEvent::SendMessage {
            recipient_id,
            content,
        } => {
            let Some(sender_id) = user_id else {
                router.send_to(
                    conn_id,
                    ServerEvent::error(ErrorCode::Unauthorized, "未登录，无法发送私信"),
                );
                return;
            };

            match send_message(storage, sender_id, recipient_id, content.as_deref()).await {
                Ok(message) => {
                    let delivered = router.deliver_message(&message);
                    debug!("私信 {} 已推送到 {} 个连接", message.id, delivered);
                }
                Err(failure) => {
                    if let SendFailure::Storage(ref e) = failure {
                        error!("WebSocket 私信写入失败: {}", e);
                    }
                    router.send_to(
                        conn_id,
                        ServerEvent::error(failure.error_code(), failure.message()),
                    );
                }
            }
        }
        signal => {
            let Some(from) = user_id else {
                router.send_to(
                    conn_id,
                    ServerEvent::error(ErrorCode::Unauthorized, "未登录，无法发起通话"),
                );
                return;
            };
            if let Some((to, outbound)) = signal.into_signal(from) {
                let delivered = router.relay(to, outbound);
                debug!("信令 {} -> {} 送达 {} 个连接", from, to, delivered);
            }
        }
    }
}

/// WebSocket 服务
pub struct WebSocketService;

impl WebSocketService {
    /// 处理 WebSocket 连接
    pub async fn handle_connection(
        router: Arc<PresenceRouter>,
        storage: Arc<dyn Storage>,
        user_id: Option<i64>,
        heartbeat_interval: Duration,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let (conn_id, mut inbox) = router.connect(user_id);
        info!("WebSocket connected: conn={} user={:?}", conn_id, user_id);

        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        // 第一次 tick 立即完成，跳过
        heartbeat.tick().await;

        loop {
            tokio::select! {
                // 处理来自客户端的消息
                frame = stream.next() => {
                    match frame {
                        Some(Ok(WsFrame::Text(text))) => {
                            match serde_json::from_str::<ClientEvent>(&text) {
                                Ok(event) => {
                                    dispatch(&router, storage.as_ref(), conn_id, user_id, event).await;
                                }
                                Err(e) => {
                                    debug!("无法解析的 WebSocket 帧 (conn={}): {}", conn_id, e);
                                    router.send_to(
                                        conn_id,
                                        ServerEvent::error(ErrorCode::BadRequest, "无法识别的消息格式"),
                                    );
                                }
                            }
                        }
                        Some(Ok(WsFrame::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(WsFrame::Close(_))) | None => {
                            info!("WebSocket closed: conn={}", conn_id);
                            break;
                        }
                        Some(Err(e)) => {
                            warn!("WebSocket error (conn={}): {:?}", conn_id, e);
                            break;
                        }
                        _ => {}
                    }
                }

                // 处理路由表推送的消息
                event = inbox.recv() => {
                    match event {
                        Some(event) => {
                            if session.text(event.to_json()).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }

                // 心跳
                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        // 清理连接
        router.disconnect(conn_id);
        let _ = session.close(None).await;
        info!("WebSocket disconnected: conn={}", conn_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures::{self, Fixture};
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn drain(inbox: &mut UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = inbox.try_recv() {
            events.push(event);
        }
        events
    }

    fn error_code(event: &ServerEvent) -> Option<i32> {
        match event {
            ServerEvent::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_send_message_persists_then_fans_out() {
        let Fixture {
            storage,
            teacher,
            parent,
            ..
        } = fixtures::school().await;
        let router = PresenceRouter::new();
        let (teacher_conn, mut teacher_inbox) = router.connect(Some(teacher.id));
        let (_, mut parent_inbox) = router.connect(Some(parent.id));
        drain(&mut teacher_inbox);
        drain(&mut parent_inbox);

        let event = ClientEvent::SendMessage {
            recipient_id: Some(parent.id),
            content: Some("  家长会改到周五  ".to_string()),
        };
        dispatch(&router, &storage, teacher_conn, Some(teacher.id), event).await;

        let to_teacher = drain(&mut teacher_inbox);
        let to_parent = drain(&mut parent_inbox);
        assert_eq!(to_teacher.len(), 1);
        assert_eq!(to_teacher, to_parent);
        match &to_parent[0] {
            ServerEvent::NewMessage {
                sender_id,
                recipient_id,
                content,
                ..
            } => {
                assert_eq!(*sender_id, teacher.id);
                assert_eq!(*recipient_id, parent.id);
                assert_eq!(content, "家长会改到周五");
            }
            other => panic!("unexpected event: {other:?}"),
        }

        assert_eq!(storage.count_unread_messages(parent.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rejected_message_only_answers_sender() {
        let Fixture {
            storage,
            teacher,
            parent,
            ..
        } = fixtures::school().await;
        let router = PresenceRouter::new();
        let (teacher_conn, mut teacher_inbox) = router.connect(Some(teacher.id));
        let (_, mut parent_inbox) = router.connect(Some(parent.id));
        drain(&mut teacher_inbox);
        drain(&mut parent_inbox);

        let event = ClientEvent::SendMessage {
            recipient_id: Some(parent.id),
            content: Some("   ".to_string()),
        };
        dispatch(&router, &storage, teacher_conn, Some(teacher.id), event).await;

        let events = drain(&mut teacher_inbox);
        assert_eq!(events.len(), 1);
        assert_eq!(
            error_code(&events[0]),
            Some(ErrorCode::EmptyMessageContent.as_i32())
        );
        assert!(drain(&mut parent_inbox).is_empty());
        assert_eq!(storage.count_unread_messages(parent.id).await.unwrap(), 0);

        let event = ClientEvent::SendMessage {
            recipient_id: Some(9999),
            content: Some("hello".to_string()),
        };
        dispatch(&router, &storage, teacher_conn, Some(teacher.id), event).await;
        let events = drain(&mut teacher_inbox);
        assert_eq!(
            error_code(&events[0]),
            Some(ErrorCode::RecipientNotFound.as_i32())
        );
    }

    #[tokio::test]
    async fn test_anonymous_connection_cannot_send_or_signal() {
        let Fixture {
            storage, parent, ..
        } = fixtures::school().await;
        let router = PresenceRouter::new();
        let (anon_conn, mut anon_inbox) = router.connect(None);
        let (_, mut parent_inbox) = router.connect(Some(parent.id));
        drain(&mut parent_inbox);

        let event = ClientEvent::SendMessage {
            recipient_id: Some(parent.id),
            content: Some("hi".to_string()),
        };
        dispatch(&router, &storage, anon_conn, None, event).await;

        let event = ClientEvent::EndCall { to: parent.id };
        dispatch(&router, &storage, anon_conn, None, event).await;

        let events = drain(&mut anon_inbox);
        assert_eq!(events.len(), 2);
        assert!(
            events
                .iter()
                .all(|e| error_code(e) == Some(ErrorCode::Unauthorized.as_i32()))
        );
        assert!(drain(&mut parent_inbox).is_empty());
        assert_eq!(storage.count_unread_messages(parent.id).await.unwrap(), 0);

        // 匿名连接依然可以心跳
        dispatch(&router, &storage, anon_conn, None, ClientEvent::Ping).await;
        assert_eq!(drain(&mut anon_inbox), vec![ServerEvent::Pong]);
    }

    #[tokio::test]
    async fn test_signal_relay_sets_from() {
        let Fixture {
            storage,
            teacher,
            parent,
            ..
        } = fixtures::school().await;
        let router = PresenceRouter::new();
        let (teacher_conn, mut teacher_inbox) = router.connect(Some(teacher.id));
        let (_, mut parent_inbox) = router.connect(Some(parent.id));
        drain(&mut teacher_inbox);
        drain(&mut parent_inbox);

        let event = ClientEvent::IceCandidate {
            to: parent.id,
            candidate: json!({"candidate": "candidate:1 1 UDP 2122 192.0.2.1 5000 typ host"}),
        };
        dispatch(&router, &storage, teacher_conn, Some(teacher.id), event).await;

        assert_eq!(
            drain(&mut parent_inbox),
            vec![ServerEvent::IceCandidate {
                from: teacher.id,
                candidate: json!({"candidate": "candidate:1 1 UDP 2122 192.0.2.1 5000 typ host"}),
            }]
        );
        assert!(drain(&mut teacher_inbox).is_empty());
    }

    #[tokio::test]
    async fn test_join_errors_are_reported() {
        let Fixture {
            storage, teacher, ..
        } = fixtures::school().await;
        let router = PresenceRouter::new();
        let (conn, mut inbox) = router.connect(Some(teacher.id));
        drain(&mut inbox);

        let event = ClientEvent::Join {
            room: "no spaces allowed".to_string(),
        };
        dispatch(&router, &storage, conn, Some(teacher.id), event).await;
        let event = ClientEvent::Join {
            room: user_room(teacher.id + 1000),
        };
        dispatch(&router, &storage, conn, Some(teacher.id), event).await;
        let event = ClientEvent::Join {
            room: "class:1".to_string(),
        };
        dispatch(&router, &storage, conn, Some(teacher.id), event).await;

        let events = drain(&mut inbox);
        assert_eq!(events.len(), 3);
        assert_eq!(
            error_code(&events[0]),
            Some(ErrorCode::InvalidRoomName.as_i32())
        );
        assert_eq!(error_code(&events[1]), Some(ErrorCode::Forbidden.as_i32()));
        assert_eq!(
            events[2],
            ServerEvent::Joined {
                room: "class:1".to_string()
            }
        );
    }
}
