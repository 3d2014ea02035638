//! 考试实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub exam_type: String,
    pub class_id: i64,
    pub subject_id: i64,
    pub exam_date: chrono::NaiveDate,
    pub total_marks: i32,
    pub passing_marks: Option<i32>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_exam(self) -> crate::models::exams::entities::Exam {
        crate::models::exams::entities::Exam {
            id: self.id,
            title: self.title,
            exam_type: self.exam_type,
            class_id: self.class_id,
            subject_id: self.subject_id,
            exam_date: self.exam_date,
            total_marks: self.total_marks,
            passing_marks: self.passing_marks,
            created_at: super::timestamp_to_utc(self.created_at),
        }
    }
}
