//! 测试数据

use super::SeaOrmStorage;
use crate::models::{
    classes::{
        entities::{Class, Subject},
        requests::{CreateClassRequest, CreateSubjectRequest},
    },
    students::{entities::Student, requests::CreateStudentRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

pub(crate) struct Fixture {
    pub storage: SeaOrmStorage,
    pub admin: User,
    pub teacher: User,
    pub parent: User,
    pub class: Class,
    pub other_class: Class,
    pub math: Subject,
    pub science: Subject,
    // 前两名在 class，第三名在 other_class
    pub students: Vec<Student>,
    pub student_users: Vec<User>,
}

pub(crate) async fn user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            email: email.to_string(),
            full_name: email.split('@').next().unwrap_or(email).to_string(),
            role,
        })
        .await
        .unwrap()
}

/// 一个小学校：两个班、两门课、三名学生、一位家长
pub(crate) async fn school() -> Fixture {
    let storage = SeaOrmStorage::new_in_memory().await.unwrap();

    let admin = user(&storage, "admin@school.test", UserRole::Admin).await;
    let teacher = user(&storage, "teacher@school.test", UserRole::Teacher).await;
    let parent = user(&storage, "parent@school.test", UserRole::Parent).await;

    let class = storage
        .create_class_impl(CreateClassRequest {
            name: "Grade 7".to_string(),
            section: Some("A".to_string()),
            teacher_id: Some(teacher.id),
        })
        .await
        .unwrap();
    let other_class = storage
        .create_class_impl(CreateClassRequest {
            name: "Grade 8".to_string(),
            section: None,
            teacher_id: Some(teacher.id),
        })
        .await
        .unwrap();

    let math = storage
        .create_subject_impl(CreateSubjectRequest {
            name: "Mathematics".to_string(),
            code: Some("MATH7".to_string()),
            class_id: class.id,
            teacher_id: Some(teacher.id),
        })
        .await
        .unwrap();
    let science = storage
        .create_subject_impl(CreateSubjectRequest {
            name: "Science".to_string(),
            code: Some("SCI7".to_string()),
            class_id: class.id,
            teacher_id: Some(teacher.id),
        })
        .await
        .unwrap();

    let mut students = Vec::new();
    let mut student_users = Vec::new();
    for (i, class_id) in [class.id, class.id, other_class.id].into_iter().enumerate() {
        let account = user(
            &storage,
            &format!("student{i}@school.test"),
            UserRole::Student,
        )
        .await;
        let student = storage
            .create_student_impl(CreateStudentRequest {
                user_id: account.id,
                student_number: format!("S{:03}", i + 1),
                class_id: Some(class_id),
                parent_id: (i == 0).then_some(parent.id),
            })
            .await
            .unwrap();
        students.push(student);
        student_users.push(account);
    }

    Fixture {
        storage,
        admin,
        teacher,
        parent,
        class,
        other_class,
        math,
        science,
        students,
        student_users,
    }
}
