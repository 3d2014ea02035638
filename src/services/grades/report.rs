use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use super::calc;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::grades::responses::ReportCardResponse;
use crate::models::students::entities::Student;
use crate::services::access::{current_user, internal_error, load_viewable_student};
use crate::services::attendance::calc::AttendanceTally;
use crate::storage::Storage;

/// 组装学生成绩单
///
/// 科目取学生当前班级的全部科目，出勤率取全部历史记录。
pub async fn build_report_card(
    storage: &dyn Storage,
    student: &Student,
) -> Result<ReportCardResponse> {
    let full_name = storage
        .get_user_by_id(student.user_id)
        .await?
        .map(|u| u.full_name)
        .unwrap_or_default();

    let class = match student.class_id {
        Some(class_id) => storage.get_class_by_id(class_id).await?,
        None => None,
    };

    let subjects = match &class {
        Some(class) => {
            let subjects = storage.list_subjects_by_class(class.id).await?;
            let exams = storage.list_exams_by_class(class.id).await?;
            let results: HashMap<i64, _> = storage
                .list_results_by_student(student.id)
                .await?
                .into_iter()
                .map(|r| (r.exam_id, r))
                .collect();

            subjects
                .iter()
                .map(|subject| calc::grade_subject(subject, &exams, &results))
                .collect()
        }
        None => Vec::new(),
    };

    let attendance = storage
        .list_student_attendance(student.id, None, None)
        .await?;
    let attendance_percentage = AttendanceTally::from_records(&attendance).percentage();

    let summary = calc::summarize(&subjects, attendance_percentage);

    Ok(ReportCardResponse {
        student_id: student.id,
        student_number: student.student_number.clone(),
        full_name,
        class_id: class.as_ref().map(|c| c.id),
        class_name: class.map(|c| c.name),
        subjects,
        summary,
    })
}

pub async fn get_report_card(
    service: &GradeService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match load_viewable_student(&storage, &viewer, student_id).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    match build_report_card(storage.as_ref(), &student).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "查询成功"))),
        Err(e) => Ok(internal_error("生成成绩单失败", e)),
    }
}
