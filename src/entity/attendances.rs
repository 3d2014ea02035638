//! 考勤实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: chrono::NaiveDate,
    pub status: String,
    pub marked_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为领域记录，状态值无法识别时返回 None
    pub fn into_record(self) -> Option<crate::models::attendance::entities::AttendanceRecord> {
        use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};

        let status = match self.status.parse::<AttendanceStatus>() {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!(
                    "Skipping attendance row {} with unknown status {:?}",
                    self.id,
                    self.status
                );
                return None;
            }
        };

        Some(AttendanceRecord {
            id: self.id,
            student_id: self.student_id,
            class_id: self.class_id,
            date: self.date,
            status,
            marked_by: self.marked_by,
        })
    }
}
