use crate::cache::{MokaCacheWrapper, ObjectCache};
use crate::config::AppConfig;
use crate::services::PresenceRouter;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub router: Arc<PresenceRouter>,
}

/// 创建身份缓存
fn create_cache(config: &AppConfig) -> Arc<dyn ObjectCache> {
    let cache = MokaCacheWrapper::from_config(&config.cache);
    warn!(
        "Identity cache initialized (capacity: {}, ttl: {}s)",
        config.cache.max_capacity, config.cache.default_ttl
    );
    Arc::new(cache)
}

/// 准备服务器启动的上下文
/// 包括存储、身份缓存和实时路由表
pub async fn prepare_server_startup() -> crate::errors::Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache(config);

    let router = Arc::new(PresenceRouter::new());
    debug!(
        "Presence router ready, heartbeat every {}s",
        config.realtime.heartbeat_interval
    );

    Ok(StartupContext {
        storage,
        cache,
        router,
    })
}
