use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::middlewares::authenticate_token;
use crate::services::{PresenceRouter, WebSocketService};
use crate::storage::Storage;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

// 升级为 WebSocket 连接
//
// 令牌缺失或无效时仍然接受连接，但不加入任何房间。
pub async fn ws_connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<WsQuery>,
    storage: web::Data<Arc<dyn Storage>>,
    cache: web::Data<Arc<dyn ObjectCache>>,
    router: web::Data<Arc<PresenceRouter>>,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();

    let user_id = match query.token.as_deref() {
        Some(token) => match authenticate_token(
            token,
            &config.jwt.secret,
            cache.get_ref().as_ref(),
            storage.get_ref().as_ref(),
        )
        .await
        {
            Ok(user) => Some(user.id),
            Err(err) => {
                info!("WebSocket authentication failed: {}", err);
                None
            }
        },
        None => None,
    };

    let (response, session, stream) = actix_ws::handle(&req, body)?;

    actix_web::rt::spawn(WebSocketService::handle_connection(
        router.get_ref().clone(),
        storage.get_ref().clone(),
        user_id,
        Duration::from_secs(config.realtime.heartbeat_interval),
        session,
        stream,
    ));

    Ok(response)
}

// 配置路由
pub fn configure_websocket_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/ws", web::get().to(ws_connect));
}
