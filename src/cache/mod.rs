//! 身份缓存
//!
//! 以访问令牌为键缓存已解析的用户，避免每个请求都查询存储。

pub mod moka;

use async_trait::async_trait;

pub use self::moka::MokaCacheWrapper;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;

    async fn insert_raw(&self, key: String, value: String);

    async fn remove(&self, key: &str);

    async fn invalidate_all(&self);
}
