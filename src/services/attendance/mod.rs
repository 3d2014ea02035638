pub mod calc;
mod class;
mod student;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::attendance::requests::{
    DayQuery, MarkAttendanceRequest, MonthQuery, RangeQuery,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 学生月度考勤
    pub async fn student_month(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: MonthQuery,
    ) -> ActixResult<HttpResponse> {
        student::student_month(self, request, student_id, query).await
    }

    // 学生任意区间考勤
    pub async fn student_range(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: RangeQuery,
    ) -> ActixResult<HttpResponse> {
        student::student_range(self, request, student_id, query).await
    }

    // 班级某日点名册
    pub async fn class_day_roll(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: DayQuery,
    ) -> ActixResult<HttpResponse> {
        class::class_day_roll(self, request, class_id, query).await
    }

    // 登记班级某日考勤
    pub async fn mark_class_day(
        &self,
        request: &HttpRequest,
        class_id: i64,
        body: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        class::mark_class_day(self, request, class_id, body).await
    }

    // 班级月度报表
    pub async fn class_monthly_report(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: MonthQuery,
    ) -> ActixResult<HttpResponse> {
        class::class_monthly_report(self, request, class_id, query).await
    }
}
