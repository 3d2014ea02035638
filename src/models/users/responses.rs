use serde::Serialize;
use ts_rs::TS;

use super::entities::UserRole;

// 用户简要信息（联系人、会话对象）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserBrief {
    pub id: i64,
    pub full_name: String,
    pub role: UserRole,
}

impl From<&super::entities::User> for UserBrief {
    fn from(user: &super::entities::User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}
