use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use super::calc;
use super::student::rejection_response;
use crate::models::attendance::{
    entities::DayStatus,
    requests::{DayQuery, MarkAttendanceRequest, MonthQuery},
    responses::{
        ClassDayRoll, ClassMonthlyReport, MarkAttendanceResponse, RollEntry, StudentMonthlyRow,
    },
};
use crate::models::classes::entities::Class;
use crate::models::students::entities::Student;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error};
use crate::storage::Storage;

async fn load_class(storage: &dyn Storage, class_id: i64) -> Result<Class, HttpResponse> {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => Ok(class),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "班级不存在",
        ))),
        Err(e) => Err(internal_error("查询班级失败", e)),
    }
}

/// 班级学生及其姓名
async fn load_roster(
    storage: &dyn Storage,
    class_id: i64,
) -> Result<Vec<(Student, String)>, HttpResponse> {
    let students = storage
        .list_students_by_class(class_id)
        .await
        .map_err(|e| internal_error("查询班级学生失败", e))?;

    let mut roster = Vec::with_capacity(students.len());
    for student in students {
        let full_name = match storage.get_user_by_id(student.user_id).await {
            Ok(Some(user)) => user.full_name,
            Ok(None) => String::new(),
            Err(e) => return Err(internal_error("查询学生账号失败", e)),
        };
        roster.push((student, full_name));
    }
    Ok(roster)
}

pub async fn class_day_roll(
    service: &AttendanceService,
    request: &HttpRequest,
    class_id: i64,
    query: DayQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let date = query
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let class = match load_class(storage.as_ref(), class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let roster = match load_roster(storage.as_ref(), class.id).await {
        Ok(roster) => roster,
        Err(resp) => return Ok(resp),
    };

    let records = match storage.list_class_attendance(class.id, date).await {
        Ok(records) => records,
        Err(e) => return Ok(internal_error("查询班级考勤失败", e)),
    };
    let by_student: HashMap<i64, _> = records.iter().map(|r| (r.student_id, r.status)).collect();

    let entries = roster
        .into_iter()
        .map(|(student, full_name)| RollEntry {
            student_id: student.id,
            status: DayStatus::from(by_student.get(&student.id).copied()),
            student_number: student.student_number,
            full_name,
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassDayRoll {
            class_id: class.id,
            date,
            entries,
        },
        "查询成功",
    )))
}

pub async fn mark_class_day(
    service: &AttendanceService,
    request: &HttpRequest,
    class_id: i64,
    body: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let marker = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let class = match load_class(storage.as_ref(), class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };

    let members: HashSet<i64> = match storage.list_students_by_class(class.id).await {
        Ok(students) => students.iter().map(|s| s.id).collect(),
        Err(e) => return Ok(internal_error("查询班级学生失败", e)),
    };

    if let Err(rejection) = calc::validate_entries(&members, &body.entries) {
        return Ok(rejection_response(&rejection));
    }

    match storage
        .replace_class_attendance(class.id, body.date, marker.id, &body.entries)
        .await
    {
        Ok(recorded) => {
            info!(
                "用户 {} 登记了班级 {} 在 {} 的考勤，共 {} 条",
                marker.id, class.id, body.date, recorded
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkAttendanceResponse {
                    class_id: class.id,
                    date: body.date,
                    recorded,
                },
                "考勤已保存",
            )))
        }
        Err(e) => Ok(internal_error("保存考勤失败", e)),
    }
}

pub async fn class_monthly_report(
    service: &AttendanceService,
    request: &HttpRequest,
    class_id: i64,
    query: MonthQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (default_year, default_month) = calc::current_month();
    let year = query.year.unwrap_or(default_year);
    let month = query.month.unwrap_or(default_month);
    let (start, end) = match calc::month_window(year, month) {
        Ok(window) => window,
        Err(rejection) => return Ok(rejection_response(&rejection)),
    };

    let class = match load_class(storage.as_ref(), class_id).await {
        Ok(class) => class,
        Err(resp) => return Ok(resp),
    };
    let roster = match load_roster(storage.as_ref(), class.id).await {
        Ok(roster) => roster,
        Err(resp) => return Ok(resp),
    };

    // 每个学生独立计算
    let mut students = Vec::with_capacity(roster.len());
    for (student, full_name) in roster {
        let records = match storage
            .list_student_attendance(student.id, Some(start), Some(end))
            .await
        {
            Ok(records) => records,
            Err(e) => return Ok(internal_error("查询考勤记录失败", e)),
        };
        let summary = match calc::summarize(student.id, start, end, &records) {
            Ok(summary) => summary,
            Err(rejection) => return Ok(rejection_response(&rejection)),
        };
        students.push(StudentMonthlyRow {
            student_number: student.student_number,
            full_name,
            summary,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassMonthlyReport {
            class_id: class.id,
            year,
            month,
            students,
        },
        "查询成功",
    )))
}
