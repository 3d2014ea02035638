use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

use super::events::ServerEvent;
use crate::models::messages::entities::Message;
use crate::utils::validate::validate_room_name;

pub type ConnectionId = u64;

type Outbox = mpsc::UnboundedSender<ServerEvent>;

/// 用户的规范房间名
pub fn user_room(user_id: i64) -> String {
    format!("user_{user_id}")
}

/// 加入房间失败的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinRejection {
    InvalidName(&'static str),
    /// 其他用户的规范房间
    Forbidden,
    UnknownConnection,
}

struct ConnectionState {
    user_id: Option<i64>,
    rooms: HashSet<String>,
    outbox: Outbox,
}

/// 在线连接与房间绑定表
///
/// 以 `web::Data<Arc<PresenceRouter>>` 注入，每个连接拥有一个无界发送队列。
/// 两张表从不同时持有锁。
pub struct PresenceRouter {
    next_id: AtomicU64,
    connections: DashMap<ConnectionId, ConnectionState>,
    rooms: DashMap<String, HashMap<ConnectionId, Outbox>>,
}

impl Default for PresenceRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PresenceRouter {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// 注册连接，已认证的连接自动加入规范房间
    pub fn connect(
        &self,
        user_id: Option<i64>,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<ServerEvent>) {
        let (outbox, inbox) = mpsc::unbounded_channel();
        let conn_id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.connections.insert(
            conn_id,
            ConnectionState {
                user_id,
                rooms: HashSet::new(),
                outbox,
            },
        );

        if let Some(user_id) = user_id {
            self.bind(conn_id, &user_room(user_id));
        }

        (conn_id, inbox)
    }

    /// 加入额外房间，保留已有绑定
    pub fn join(&self, conn_id: ConnectionId, room: &str) -> Result<(), JoinRejection> {
        validate_room_name(room).map_err(JoinRejection::InvalidName)?;

        let user_id = self
            .connections
            .get(&conn_id)
            .map(|state| state.user_id)
            .ok_or(JoinRejection::UnknownConnection)?;

        if room.starts_with("user_") && user_id.map(user_room).as_deref() != Some(room) {
            return Err(JoinRejection::Forbidden);
        }

        if self.bind(conn_id, room) {
            Ok(())
        } else {
            Err(JoinRejection::UnknownConnection)
        }
    }

    fn bind(&self, conn_id: ConnectionId, room: &str) -> bool {
        let outbox = {
            let Some(mut state) = self.connections.get_mut(&conn_id) else {
                return false;
            };
            state.rooms.insert(room.to_string());
            state.outbox.clone()
        };

        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(conn_id, outbox.clone());

        let _ = outbox.send(ServerEvent::Joined {
            room: room.to_string(),
        });
        debug!("连接 {} 加入房间 {}", conn_id, room);
        true
    }

    /// 断开连接并释放全部房间绑定
    pub fn disconnect(&self, conn_id: ConnectionId) {
        let Some((_, state)) = self.connections.remove(&conn_id) else {
            return;
        };

        for room in &state.rooms {
            self.release(room, &[conn_id]);
        }
        debug!("连接 {} 已释放 {} 个房间", conn_id, state.rooms.len());
    }

    fn release(&self, room: &str, conn_ids: &[ConnectionId]) {
        if let Some(mut members) = self.rooms.get_mut(room) {
            for conn_id in conn_ids {
                members.remove(conn_id);
            }
        }
        self.rooms.remove_if(room, |_, members| members.is_empty());
    }

    /// 向单个连接推送
    pub fn send_to(&self, conn_id: ConnectionId, event: ServerEvent) -> bool {
        let outbox = match self.connections.get(&conn_id) {
            Some(state) => state.outbox.clone(),
            None => return false,
        };
        outbox.send(event).is_ok()
    }

    /// 向若干房间推送，同一连接只收到一次；返回送达的连接数
    pub fn emit_to_rooms(&self, rooms: &[String], event: &ServerEvent) -> usize {
        let mut targets: HashMap<ConnectionId, Outbox> = HashMap::new();
        for room in rooms {
            if let Some(members) = self.rooms.get(room) {
                for (conn_id, outbox) in members.iter() {
                    targets.entry(*conn_id).or_insert_with(|| outbox.clone());
                }
            }
        }

        let mut delivered = 0;
        let mut stale = Vec::new();
        for (conn_id, outbox) in targets {
            if outbox.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                stale.push(conn_id);
            }
        }

        if !stale.is_empty() {
            for room in rooms {
                self.release(room, &stale);
            }
        }

        delivered
    }

    pub fn emit_to_room(&self, room: &str, event: &ServerEvent) -> usize {
        self.emit_to_rooms(&[room.to_string()], event)
    }

    pub fn emit_to_user(&self, user_id: i64, event: &ServerEvent) -> usize {
        self.emit_to_room(&user_room(user_id), event)
    }

    /// 新私信推送到发件人与收件人的规范房间
    pub fn deliver_message(&self, message: &Message) -> usize {
        let event = ServerEvent::from(message);
        self.emit_to_rooms(
            &[user_room(message.sender_id), user_room(message.recipient_id)],
            &event,
        )
    }

    /// 信令转发，目标离线时丢弃
    pub fn relay(&self, to: i64, event: ServerEvent) -> usize {
        self.emit_to_user(to, &event)
    }

    pub fn is_online(&self, user_id: i64) -> bool {
        self.rooms
            .get(&user_room(user_id))
            .is_some_and(|members| !members.is_empty())
    }

    /// 在线用户数（去重）
    pub fn online_count(&self) -> usize {
        self.connections
            .iter()
            .filter_map(|entry| entry.user_id)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn rooms_of(&self, conn_id: ConnectionId) -> Vec<String> {
        let mut rooms: Vec<String> = self
            .connections
            .get(&conn_id)
            .map(|state| state.rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    pub fn room_size(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, |members| members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn drain(inbox: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = inbox.try_recv() {
            events.push(event);
        }
        events
    }

    fn message(id: i64, sender_id: i64, recipient_id: i64) -> Message {
        Message {
            id,
            sender_id,
            recipient_id,
            content: "hello".to_string(),
            created_at: Utc::now(),
            is_read: false,
        }
    }

    fn joined(room: &str) -> ServerEvent {
        ServerEvent::Joined {
            room: room.to_string(),
        }
    }

    #[test]
    fn test_authenticated_connection_joins_canonical_room() {
        let router = PresenceRouter::new();
        let (conn, mut inbox) = router.connect(Some(7));

        assert_eq!(drain(&mut inbox), vec![joined("user_7")]);
        assert_eq!(router.rooms_of(conn), vec!["user_7".to_string()]);
        assert!(router.is_online(7));
        assert_eq!(router.online_count(), 1);
    }

    #[test]
    fn test_anonymous_connection_joins_nothing() {
        let router = PresenceRouter::new();
        let (conn, mut inbox) = router.connect(None);

        assert!(drain(&mut inbox).is_empty());
        assert!(router.rooms_of(conn).is_empty());
        assert_eq!(router.online_count(), 0);
        assert_eq!(router.connection_count(), 1);
    }

    #[test]
    fn test_extra_join_keeps_canonical_room() {
        let router = PresenceRouter::new();
        let (conn, mut inbox) = router.connect(Some(7));
        drain(&mut inbox);

        router.join(conn, "class:3").unwrap();
        assert_eq!(drain(&mut inbox), vec![joined("class:3")]);
        assert_eq!(
            router.rooms_of(conn),
            vec!["class:3".to_string(), "user_7".to_string()]
        );

        let event = ServerEvent::Pong;
        assert_eq!(router.emit_to_room("class:3", &event), 1);
        assert_eq!(router.emit_to_user(7, &event), 1);
    }

    #[test]
    fn test_join_rejections() {
        let router = PresenceRouter::new();
        let (conn, _inbox) = router.connect(Some(7));

        assert!(matches!(
            router.join(conn, "bad room"),
            Err(JoinRejection::InvalidName(_))
        ));
        assert_eq!(router.join(conn, "user_8"), Err(JoinRejection::Forbidden));
        assert_eq!(router.join(999, "lobby"), Err(JoinRejection::UnknownConnection));
        // 重复加入自己的规范房间是允许的
        assert_eq!(router.join(conn, "user_7"), Ok(()));
        assert_eq!(router.room_size("user_7"), 1);
    }

    #[test]
    fn test_deliver_message_reaches_both_rooms() {
        let router = PresenceRouter::new();
        let (_, mut sender_inbox) = router.connect(Some(1));
        let (_, mut recipient_inbox) = router.connect(Some(2));
        let (_, mut bystander_inbox) = router.connect(Some(3));
        drain(&mut sender_inbox);
        drain(&mut recipient_inbox);
        drain(&mut bystander_inbox);

        let msg = message(10, 1, 2);
        assert_eq!(router.deliver_message(&msg), 2);

        let expected = ServerEvent::from(&msg);
        assert_eq!(drain(&mut sender_inbox), vec![expected.clone()]);
        assert_eq!(drain(&mut recipient_inbox), vec![expected]);
        assert!(drain(&mut bystander_inbox).is_empty());
    }

    #[test]
    fn test_offline_recipient_is_dropped() {
        let router = PresenceRouter::new();
        let (_, mut sender_inbox) = router.connect(Some(1));
        drain(&mut sender_inbox);

        assert_eq!(router.deliver_message(&message(11, 1, 2)), 1);
        assert_eq!(drain(&mut sender_inbox).len(), 1);

        let signal = ServerEvent::EndCall { from: 1 };
        assert_eq!(router.relay(2, signal), 0);
    }

    #[test]
    fn test_multiple_connections_per_user() {
        let router = PresenceRouter::new();
        let (first, mut first_inbox) = router.connect(Some(5));
        let (_, mut second_inbox) = router.connect(Some(5));
        drain(&mut first_inbox);
        drain(&mut second_inbox);

        assert_eq!(router.room_size("user_5"), 2);
        assert_eq!(router.online_count(), 1);

        let signal = ServerEvent::EndCall { from: 9 };
        assert_eq!(router.relay(5, signal.clone()), 2);
        assert_eq!(drain(&mut first_inbox), vec![signal.clone()]);
        assert_eq!(drain(&mut second_inbox), vec![signal]);

        router.disconnect(first);
        assert!(router.is_online(5));
        assert_eq!(router.room_size("user_5"), 1);
    }

    #[test]
    fn test_connection_in_both_rooms_receives_once() {
        let router = PresenceRouter::new();
        let (conn, mut inbox) = router.connect(Some(1));
        router.join(conn, "shared").unwrap();
        drain(&mut inbox);

        let rooms = vec!["user_1".to_string(), "shared".to_string()];
        assert_eq!(router.emit_to_rooms(&rooms, &ServerEvent::Pong), 1);
        assert_eq!(drain(&mut inbox), vec![ServerEvent::Pong]);
    }

    #[test]
    fn test_disconnect_releases_all_bindings() {
        let router = PresenceRouter::new();
        let (conn, _inbox) = router.connect(Some(4));
        router.join(conn, "lobby").unwrap();

        router.disconnect(conn);

        assert!(router.rooms_of(conn).is_empty());
        assert_eq!(router.room_size("user_4"), 0);
        assert_eq!(router.room_size("lobby"), 0);
        assert!(!router.is_online(4));
        assert_eq!(router.connection_count(), 0);
        assert!(!router.send_to(conn, ServerEvent::Pong));

        // 重复断开是无操作
        router.disconnect(conn);
    }

    #[test]
    fn test_closed_receiver_is_pruned_on_emit() {
        let router = PresenceRouter::new();
        let (_, inbox) = router.connect(Some(6));
        drop(inbox);

        assert_eq!(router.emit_to_user(6, &ServerEvent::Pong), 0);
        assert_eq!(router.room_size("user_6"), 0);
    }
}
