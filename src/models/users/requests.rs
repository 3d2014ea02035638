use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求（由身份同步流程使用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}
