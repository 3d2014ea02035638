use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::RecordResultRequest;
use crate::models::users::entities::UserRole;
use crate::services::ExamService;
use crate::utils::SafeExamIdI64;

// 懒加载的全局 ExamService 实例
static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

// 录入或更新考试成绩
pub async fn record_result(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    body: web::Json<RecordResultRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .record_result(&req, exam_id.0, body.into_inner())
        .await
}

// 考试统计
pub async fn exam_stats(req: HttpRequest, exam_id: SafeExamIdI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.exam_stats(&req, exam_id.0).await
}

// 配置路由
pub fn configure_exams_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("/{exam_id}")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("/results", web::put().to(record_result))
                    .route("/stats", web::get().to(exam_stats)),
            ),
    );
}
