use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{DayQuery, MarkAttendanceRequest, MonthQuery, RangeQuery};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::{SafeClassIdI64, SafeStudentIdI64};

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

// 学生月度考勤
pub async fn student_month(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_month(&req, student_id.0, query.into_inner())
        .await
}

// 学生区间考勤
pub async fn student_range(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
    query: web::Query<RangeQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_range(&req, student_id.0, query.into_inner())
        .await
}

// 班级某日点名表
pub async fn class_day_roll(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<DayQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .class_day_roll(&req, class_id.0, query.into_inner())
        .await
}

// 录入班级某日考勤（整日替换）
pub async fn mark_class_day(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_class_day(&req, class_id.0, body.into_inner())
        .await
}

// 班级月度报表
pub async fn class_monthly_report(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<MonthQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .class_monthly_report(&req, class_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            // 学生本人、家长与教职工均可查看，具体权限在服务层校验
            .route(
                "/students/{student_id}",
                web::get().to(student_month),
            )
            .route(
                "/students/{student_id}/range",
                web::get().to(student_range),
            )
            .service(
                web::scope("/classes/{class_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .service(
                        web::resource("")
                            .route(web::get().to(class_day_roll))
                            .route(web::post().to(mark_class_day)),
                    )
                    .route("/report", web::get().to(class_monthly_report)),
            ),
    );
}
