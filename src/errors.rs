//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_edusync_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EduSyncError {
            $($variant(String),)*
        }

        impl EduSyncError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduSyncError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduSyncError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduSyncError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduSyncError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduSyncError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_edusync_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    FileOperation("E004", "File Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
}

impl EduSyncError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为校验失败
    pub fn is_validation(&self) -> bool {
        matches!(self, EduSyncError::Validation(_))
    }

    /// 是否为资源不存在
    pub fn is_not_found(&self) -> bool {
        matches!(self, EduSyncError::NotFound(_))
    }
}

impl fmt::Display for EduSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduSyncError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EduSyncError {
    fn from(err: sea_orm::DbErr) -> Self {
        EduSyncError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for EduSyncError {
    fn from(err: std::io::Error) -> Self {
        EduSyncError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EduSyncError {
    fn from(err: serde_json::Error) -> Self {
        EduSyncError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EduSyncError {
    fn from(err: chrono::ParseError) -> Self {
        EduSyncError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduSyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduSyncError::database_config("test").code(), "E001");
        assert_eq!(EduSyncError::validation("test").code(), "E005");
        assert_eq!(EduSyncError::not_found("test").code(), "E006");
        assert_eq!(EduSyncError::authentication("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduSyncError::database_operation("test").error_type(),
            "Database Operation Error"
        );
        assert_eq!(
            EduSyncError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduSyncError::validation("Marks out of range");
        assert_eq!(err.message(), "Marks out of range");
        assert!(err.is_validation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_format_simple() {
        let err = EduSyncError::not_found("Exam 42");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Exam 42"));
    }

    #[test]
    fn test_from_db_err() {
        let err: EduSyncError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E003");
        assert!(err.message().contains("boom"));
    }
}
