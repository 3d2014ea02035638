//! 学生数据访问控制
//!
//! 管理员和教师可以查看任意学生；学生只能查看自己；家长只能查看 parent_id 指向自己的学生。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};

use crate::middlewares::RequireJWT;
use crate::models::students::entities::Student;
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 当前登录用户（由 RequireJWT 写入请求扩展）
pub fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

pub fn can_view_student(viewer: &User, student: &Student) -> bool {
    match viewer.role {
        UserRole::Admin | UserRole::Teacher => true,
        UserRole::Student => student.user_id == viewer.id,
        UserRole::Parent => student.parent_id == Some(viewer.id),
    }
}

/// 查询学生并校验访问权限
pub async fn load_viewable_student(
    storage: &Arc<dyn Storage>,
    viewer: &User,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    let student = match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "学生不存在",
            )));
        }
        Err(e) => return Err(internal_error("查询学生失败", e)),
    };

    if !can_view_student(viewer, &student) {
        return Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "无权查看该学生的数据",
        )));
    }

    Ok(student)
}

pub(crate) fn internal_error(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {e}"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("u{id}@school.test"),
            full_name: format!("User {id}"),
            role,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn student(user_id: i64, parent_id: Option<i64>) -> Student {
        Student {
            id: 100,
            user_id,
            student_number: "S100".to_string(),
            class_id: Some(1),
            parent_id,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_staff_can_view_any_student() {
        let s = student(10, None);
        assert!(can_view_student(&user(1, UserRole::Admin), &s));
        assert!(can_view_student(&user(2, UserRole::Teacher), &s));
    }

    #[test]
    fn test_student_sees_only_self() {
        let s = student(10, None);
        assert!(can_view_student(&user(10, UserRole::Student), &s));
        assert!(!can_view_student(&user(11, UserRole::Student), &s));
    }

    #[test]
    fn test_parent_sees_only_own_children() {
        let s = student(10, Some(20));
        assert!(can_view_student(&user(20, UserRole::Parent), &s));
        assert!(!can_view_student(&user(21, UserRole::Parent), &s));
        assert!(!can_view_student(&user(20, UserRole::Parent), &student(10, None)));
    }
}
