use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;

use super::AttendanceService;
use super::calc::{self, AttendanceRejection};
use crate::models::attendance::requests::{MonthQuery, RangeQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::access::{current_user, internal_error, load_viewable_student};

pub async fn student_month(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
    query: MonthQuery,
) -> ActixResult<HttpResponse> {
    let (default_year, default_month) = calc::current_month();
    let year = query.year.unwrap_or(default_year);
    let month = query.month.unwrap_or(default_month);

    let (start, end) = match calc::month_window(year, month) {
        Ok(window) => window,
        Err(rejection) => return Ok(rejection_response(&rejection)),
    };

    student_window(service, request, student_id, start, end).await
}

pub async fn student_range(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
    query: RangeQuery,
) -> ActixResult<HttpResponse> {
    student_window(service, request, student_id, query.start, query.end).await
}

async fn student_window(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> ActixResult<HttpResponse> {
    if let Err(rejection) = calc::check_range(start, end) {
        return Ok(rejection_response(&rejection));
    }

    let storage = service.get_storage(request);
    let viewer = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let student = match load_viewable_student(&storage, &viewer, student_id).await {
        Ok(student) => student,
        Err(resp) => return Ok(resp),
    };

    let records = match storage
        .list_student_attendance(student.id, Some(start), Some(end))
        .await
    {
        Ok(records) => records,
        Err(e) => return Ok(internal_error("查询考勤记录失败", e)),
    };

    match calc::summarize(student.id, start, end, &records) {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "查询成功"))),
        Err(rejection) => Ok(rejection_response(&rejection)),
    }
}

pub(super) fn rejection_response(rejection: &AttendanceRejection) -> HttpResponse {
    let code = rejection.error_code();
    let message = rejection.message();
    match code {
        ErrorCode::StudentNotInClass | ErrorCode::DuplicateAttendanceEntry => {
            HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(code, message))
        }
        _ => HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_oversized_range_maps_to_bad_request() {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let rejection = calc::check_range(start, end).unwrap_err();
        assert_eq!(rejection.error_code(), ErrorCode::DateRangeTooLong);
        assert_eq!(
            rejection_response(&rejection).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_roster_rejections_map_to_unprocessable() {
        assert_eq!(
            rejection_response(&AttendanceRejection::StudentNotInClass(3)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
