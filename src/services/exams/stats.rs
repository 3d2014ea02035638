use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ExamService;
use crate::models::exams::{
    entities::{Exam, ExamResult},
    responses::ExamStatsResponse,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::internal_error;
use crate::services::grades::calc::{mean, normalize};

/// 计算考试统计
///
/// 未设置及格线时所有成绩都视为及格。
pub fn compute_stats(exam: &Exam, results: &[ExamResult]) -> ExamStatsResponse {
    let result_count = results.len() as u32;
    let passed_count = match exam.passing_marks {
        Some(passing) => results
            .iter()
            .filter(|r| r.marks >= f64::from(passing))
            .count() as u32,
        None => result_count,
    };

    let pass_percentage = if result_count == 0 {
        0.0
    } else {
        f64::from(passed_count) / f64::from(result_count) * 100.0
    };

    ExamStatsResponse {
        exam_id: exam.id,
        total_marks: exam.total_marks,
        passing_marks: exam.passing_marks,
        result_count,
        passed_count,
        failed_count: result_count - passed_count,
        pass_percentage,
        average_marks: mean(results.iter().map(|r| r.marks)),
        average_percentage: mean(
            results
                .iter()
                .filter_map(|r| normalize(r.marks, exam.total_marks)),
        ),
    }
}

pub async fn get_exam_stats(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ExamNotFound,
                "考试不存在",
            )));
        }
        Err(e) => return Ok(internal_error("查询考试失败", e)),
    };

    match storage.list_results_by_exam(exam.id).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            compute_stats(&exam, &results),
            "查询成功",
        ))),
        Err(e) => Ok(internal_error("查询考试成绩失败", e)),
    }
}
