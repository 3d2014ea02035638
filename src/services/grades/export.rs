//! 成绩单导出（纯文本）

use std::fmt::Write;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::error;

use super::GradeService;
use super::calc::NOT_AVAILABLE;
use super::report::build_report_card;
use crate::models::grades::responses::ReportCardResponse;
use crate::services::access::{current_user, internal_error, load_viewable_student};

fn fmt_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// 渲染为纯文本
pub fn render_report_text(report: &ReportCardResponse) -> String {
    let mut out = String::new();

    // 写入 String 不会失败
    let _ = writeln!(out, "REPORT CARD");
    let _ = writeln!(out, "Student: {} ({})", report.full_name, report.student_number);
    let _ = writeln!(
        out,
        "Class: {}",
        report.class_name.as_deref().unwrap_or(NOT_AVAILABLE)
    );
    let _ = writeln!(out);

    for subject in &report.subjects {
        let _ = writeln!(
            out,
            "{} | average {} | grade {}",
            subject.name,
            fmt_pct(subject.average),
            subject.letter
        );
        for row in &subject.exams {
            let marks = row
                .marks
                .map(|m| format!("{m}/{}", row.total_marks))
                .unwrap_or_else(|| format!("-/{}", row.total_marks));
            let _ = writeln!(
                out,
                "  {} {} [{}] {} {}",
                row.exam_date,
                row.title,
                row.exam_type,
                marks,
                fmt_pct(row.percentage)
            );
        }
    }

    let summary = &report.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall average: {}", fmt_pct(summary.overall_average));
    let _ = writeln!(
        out,
        "Overall grade: {}",
        summary
            .overall_grade
            .map(|g| g.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    );
    let _ = writeln!(
        out,
        "GPA: {}",
        summary
            .gpa
            .map(|g| format!("{g:.1}"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    );
    let _ = writeln!(out, "Attendance: {:.2}%", summary.attendance_percentage);

    out
}

pub async fn export_report_card(
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

    let report = match build_report_card(storage.as_ref(), &student).await {
        Ok(report) => report,
        Err(e) => {
            error!("生成成绩单失败: {}", e);
            return Ok(internal_error("生成成绩单失败", e));
        }
    };

    let filename = format!(
        "report_card_{}_{}.txt",
        student.student_number,
        Utc::now().format("%Y%m%d")
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(render_report_text(&report)))
}
