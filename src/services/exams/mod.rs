mod results;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::exams::requests::RecordResultRequest;
use crate::storage::Storage;

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
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

    // 录入成绩
    pub async fn record_result(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        body: RecordResultRequest,
    ) -> ActixResult<HttpResponse> {
        results::record_result(self, request, exam_id, body).await
    }

    // 考试统计
    pub async fn exam_stats(&self, request: &HttpRequest, exam_id: i64) -> ActixResult<HttpResponse> {
        stats::get_exam_stats(self, request, exam_id).await
    }
}
