use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ExamService;
use crate::models::exams::{entities::Exam, requests::RecordResultRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};

/// 成绩录入被拒绝的原因
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRejection {
    InvalidTotalMarks(i32),
    MarksOutOfRange { marks: f64, total_marks: i32 },
}

impl ResultRejection {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ResultRejection::InvalidTotalMarks(_) => ErrorCode::InvalidTotalMarks,
            ResultRejection::MarksOutOfRange { .. } => ErrorCode::MarksOutOfRange,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ResultRejection::InvalidTotalMarks(total) => {
                format!("考试满分必须为正数，当前为 {total}")
            }
            ResultRejection::MarksOutOfRange { marks, total_marks } => {
                format!("成绩 {marks} 超出范围 [0, {total_marks}]")
            }
        }
    }
}

/// 校验 0 <= marks <= total_marks
pub fn validate_marks(exam: &Exam, marks: f64) -> Result<(), ResultRejection> {
    if exam.total_marks <= 0 {
        return Err(ResultRejection::InvalidTotalMarks(exam.total_marks));
    }
    if !marks.is_finite() || marks < 0.0 || marks > f64::from(exam.total_marks) {
        return Err(ResultRejection::MarksOutOfRange {
            marks,
            total_marks: exam.total_marks,
        });
    }
    Ok(())
}

pub async fn record_result(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    body: RecordResultRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let recorder = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

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

    if let Err(rejection) = validate_marks(&exam, body.marks) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            rejection.error_code(),
            rejection.message(),
        )));
    }

    let student = match storage.get_student_by_id(body.student_id).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "学生不存在",
            )));
        }
        Err(e) => return Ok(internal_error("查询学生失败", e)),
    };

    if !student.is_in_class(exam.class_id) {
        return Ok(
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::StudentNotInClass,
                "该学生不属于考试所在班级",
            )),
        );
    }

    let remarks = body
        .remarks
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    match storage
        .upsert_exam_result(exam.id, student.id, body.marks, remarks)
        .await
    {
        Ok(result) => {
            info!(
                "用户 {} 录入了考试 {} 学生 {} 的成绩: {}",
                recorder.id, exam.id, student.id, result.marks
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(result, "成绩已保存")))
        }
        Err(e) => Ok(internal_error("保存成绩失败", e)),
    }
}
