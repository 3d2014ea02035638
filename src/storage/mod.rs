use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    attendance::{entities::AttendanceRecord, requests::AttendanceEntry},
    classes::{
        entities::{Class, Subject},
        requests::{CreateClassRequest, CreateSubjectRequest},
    },
    exams::{
        entities::{Exam, ExamResult},
        requests::CreateExamRequest,
    },
    messages::entities::Message,
    students::{entities::Student, requests::CreateStudentRequest},
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 列出除指定用户外的所有活跃用户
    async fn list_active_users_except(&self, user_id: i64) -> Result<Vec<User>>;

    /// 班级与科目
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_by_class(&self, class_id: i64) -> Result<Vec<Subject>>;

    /// 学生档案
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    // 按学号排序
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    async fn list_students_by_parent(&self, parent_id: i64) -> Result<Vec<Student>>;

    /// 考勤
    // 学生在日期区间内的考勤（边界为空表示不限）
    async fn list_student_attendance(
        &self,
        student_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>>;
    // 班级某日的考勤
    async fn list_class_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>>;
    // 在一个事务内整日替换班级考勤，返回写入条数
    async fn replace_class_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        marked_by: i64,
        entries: &[AttendanceEntry],
    ) -> Result<usize>;

    /// 考试
    async fn create_exam(&self, exam: CreateExamRequest) -> Result<Exam>;
    async fn get_exam_by_id(&self, exam_id: i64) -> Result<Option<Exam>>;
    async fn list_exams_by_class(&self, class_id: i64) -> Result<Vec<Exam>>;
    async fn list_exams_by_subject(&self, subject_id: i64) -> Result<Vec<Exam>>;

    /// 考试成绩
    // 按 (exam, student) 更新或插入
    async fn upsert_exam_result(
        &self,
        exam_id: i64,
        student_id: i64,
        marks: f64,
        remarks: Option<String>,
    ) -> Result<ExamResult>;
    async fn get_exam_result(&self, exam_id: i64, student_id: i64) -> Result<Option<ExamResult>>;
    async fn list_results_by_student(&self, student_id: i64) -> Result<Vec<ExamResult>>;
    async fn list_results_by_exam(&self, exam_id: i64) -> Result<Vec<ExamResult>>;

    /// 私信
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message>;
    // 双向会话，按 (created_at, id) 升序
    async fn list_conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>>;
    // 将 partner 发给 reader 且 id <= up_to_id 的未读消息标记为已读
    async fn mark_messages_read(&self, reader_id: i64, partner_id: i64, up_to_id: i64)
    -> Result<u64>;
    async fn count_unread_messages(&self, user_id: i64) -> Result<u64>;
    // 各发送者发来的未读条数
    async fn count_unread_by_sender(&self, user_id: i64) -> Result<HashMap<i64, u64>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
