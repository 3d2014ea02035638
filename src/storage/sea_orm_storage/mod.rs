//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod classes;
mod exam_results;
mod exams;
mod messages;
mod students;
mod users;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::AppConfig;
use crate::errors::{EduSyncError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite（测试用）
    ///
    /// 内存库每个连接互相独立，连接池只能有一个连接。
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| EduSyncError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opt)
            .await
            .map_err(|e| EduSyncError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduSyncError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduSyncError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EduSyncError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EduSyncError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduSyncError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn list_active_users_except(&self, user_id: i64) -> Result<Vec<User>> {
        self.list_active_users_except_impl(user_id).await
    }

    // 班级模块
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects_by_class(&self, class_id: i64) -> Result<Vec<Subject>> {
        self.list_subjects_by_class_impl(class_id).await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(student_id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn list_students_by_parent(&self, parent_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_parent_impl(parent_id).await
    }

    // 考勤模块
    async fn list_student_attendance(
        &self,
        student_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_student_attendance_impl(student_id, start, end)
            .await
    }

    async fn list_class_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_class_attendance_impl(class_id, date).await
    }

    async fn replace_class_attendance(
        &self,
        class_id: i64,
        date: NaiveDate,
        marked_by: i64,
        entries: &[AttendanceEntry],
    ) -> Result<usize> {
        self.replace_class_attendance_impl(class_id, date, marked_by, entries)
            .await
    }

    // 考试模块
    async fn create_exam(&self, exam: CreateExamRequest) -> Result<Exam> {
        self.create_exam_impl(exam).await
    }

    async fn get_exam_by_id(&self, exam_id: i64) -> Result<Option<Exam>> {
        self.get_exam_by_id_impl(exam_id).await
    }

    async fn list_exams_by_class(&self, class_id: i64) -> Result<Vec<Exam>> {
        self.list_exams_by_class_impl(class_id).await
    }

    async fn list_exams_by_subject(&self, subject_id: i64) -> Result<Vec<Exam>> {
        self.list_exams_by_subject_impl(subject_id).await
    }

    // 成绩模块
    async fn upsert_exam_result(
        &self,
        exam_id: i64,
        student_id: i64,
        marks: f64,
        remarks: Option<String>,
    ) -> Result<ExamResult> {
        self.upsert_exam_result_impl(exam_id, student_id, marks, remarks)
            .await
    }

    async fn get_exam_result(&self, exam_id: i64, student_id: i64) -> Result<Option<ExamResult>> {
        self.get_exam_result_impl(exam_id, student_id).await
    }

    async fn list_results_by_student(&self, student_id: i64) -> Result<Vec<ExamResult>> {
        self.list_results_by_student_impl(student_id).await
    }

    async fn list_results_by_exam(&self, exam_id: i64) -> Result<Vec<ExamResult>> {
        self.list_results_by_exam_impl(exam_id).await
    }

    // 私信模块
    async fn create_message(
        &self,
        sender_id: i64,
        recipient_id: i64,
        content: &str,
    ) -> Result<Message> {
        self.create_message_impl(sender_id, recipient_id, content)
            .await
    }

    async fn list_conversation(&self, user_a: i64, user_b: i64) -> Result<Vec<Message>> {
        self.list_conversation_impl(user_a, user_b).await
    }

    async fn mark_messages_read(
        &self,
        reader_id: i64,
        partner_id: i64,
        up_to_id: i64,
    ) -> Result<u64> {
        self.mark_messages_read_impl(reader_id, partner_id, up_to_id)
            .await
    }

    async fn count_unread_messages(&self, user_id: i64) -> Result<u64> {
        self.count_unread_messages_impl(user_id).await
    }

    async fn count_unread_by_sender(&self, user_id: i64) -> Result<HashMap<i64, u64>> {
        self.count_unread_by_sender_impl(user_id).await
    }
}
