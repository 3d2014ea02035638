//! 路径参数提取器
//!
//! 只接受正整数 ID，其余情况直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

pub(crate) fn parse_positive_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|id| *id > 0)
}

macro_rules! define_safe_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                match parse_positive_id(req.match_info().get($param)) {
                    Some(id) => ready(Ok($name(id))),
                    None => {
                        let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::InvalidParameter,
                            concat!("无效的参数: ", $param),
                        ));
                        ready(Err(InternalError::from_response(
                            concat!("invalid path parameter ", $param),
                            response,
                        )
                        .into()))
                    }
                }
            }
        }
    };
}

define_safe_id_extractor!(SafeStudentIdI64, "student_id");
define_safe_id_extractor!(SafeClassIdI64, "class_id");
define_safe_id_extractor!(SafeExamIdI64, "exam_id");
define_safe_id_extractor!(SafeUserIdI64, "user_id");
