use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::GradeService;
use crate::utils::SafeStudentIdI64;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn report_card(req: HttpRequest, student_id: SafeStudentIdI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.report_card(&req, student_id.0).await
}

pub async fn export_report_card(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.export_report_card(&req, student_id.0).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .route("/students/{student_id}", web::get().to(report_card))
            .route(
                "/students/{student_id}/export",
                web::get().to(export_report_card),
            ),
    );
}
