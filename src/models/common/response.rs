use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// HTTP 响应信封
//
// 成功时 code 为 0 并携带 data；失败时 data 省略，code 指明具体原因。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    fn envelope(code: ErrorCode, data: Option<T>, message: String) -> Self {
        Self {
            code: code.as_i32(),
            message,
            data,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, Some(data), message.into())
    }
}

impl ApiResponse<()> {
    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::envelope(code, None, message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_omits_data() {
        let value =
            serde_json::to_value(ApiResponse::error_empty(ErrorCode::StudentNotFound, "学生不存在"))
                .unwrap();
        assert_eq!(value["code"], ErrorCode::StudentNotFound.as_i32());
        assert_eq!(value["message"], "学生不存在");
        assert!(value.get("data").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_success_envelope_carries_data() {
        let value = serde_json::to_value(ApiResponse::success(3_u64, "查询成功")).unwrap();
        assert_eq!(value["code"], 0);
        assert_eq!(value["data"], 3);
    }
}
