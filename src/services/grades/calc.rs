//! 成绩归一化与等级换算
//!
//! 每场考试先按满分换算成百分制，科目平均取该科已评分考试的算术平均，
//! 总平均取各科平均的算术平均（没有成绩的科目不参与），避免考试多的科目权重过大。
//! 没有任何成绩时返回 None，与“得了 0 分”区分开。

use std::collections::HashMap;

use crate::models::classes::entities::Subject;
use crate::models::exams::entities::{Exam, ExamResult};
use crate::models::grades::{
    entities::{Badge, LetterGrade, OverallGrade},
    responses::{ExamGradeRow, ReportSummary, SubjectGrade},
};

/// 无数据时的等级文本
pub const NOT_AVAILABLE: &str = "N/A";

/// 换算为百分制，满分不为正数时返回 None
pub fn normalize(marks: f64, total_marks: i32) -> Option<f64> {
    if total_marks <= 0 {
        return None;
    }
    Some(marks / f64::from(total_marks) * 100.0)
}

/// 算术平均，空集合返回 None
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

pub fn letter_grade(pct: f64) -> LetterGrade {
    if pct >= 90.0 {
        LetterGrade::APlus
    } else if pct >= 85.0 {
        LetterGrade::A
    } else if pct >= 80.0 {
        LetterGrade::AMinus
    } else if pct >= 75.0 {
        LetterGrade::BPlus
    } else if pct >= 70.0 {
        LetterGrade::B
    } else if pct >= 65.0 {
        LetterGrade::CPlus
    } else if pct >= 60.0 {
        LetterGrade::C
    } else if pct >= 50.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

pub fn overall_grade(pct: f64) -> OverallGrade {
    if pct >= 90.0 {
        OverallGrade::A
    } else if pct >= 80.0 {
        OverallGrade::B
    } else if pct >= 70.0 {
        OverallGrade::C
    } else if pct >= 60.0 {
        OverallGrade::D
    } else {
        OverallGrade::F
    }
}

/// 4.0 制绩点，只用于总平均
pub fn gpa(pct: f64) -> f64 {
    match letter_grade(pct) {
        LetterGrade::APlus => 4.0,
        LetterGrade::A => 3.7,
        LetterGrade::AMinus => 3.3,
        LetterGrade::BPlus => 3.0,
        LetterGrade::B => 2.7,
        LetterGrade::CPlus => 2.3,
        LetterGrade::C => 2.0,
        LetterGrade::D => 1.0,
        LetterGrade::F => 0.0,
    }
}

pub fn badge(pct: f64) -> Badge {
    if pct >= 80.0 {
        Badge::Excellent
    } else if pct >= 70.0 {
        Badge::Good
    } else if pct >= 60.0 {
        Badge::Average
    } else {
        Badge::Poor
    }
}

/// 等级文本，无数据时为 "N/A"
pub fn letter_or_na(pct: Option<f64>) -> String {
    pct.map(|p| letter_grade(p).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// 汇总一个科目的成绩
///
/// `exams` 为该科目的考试，`results` 以考试 ID 为键。
pub fn grade_subject(
    subject: &Subject,
    exams: &[Exam],
    results: &HashMap<i64, ExamResult>,
) -> SubjectGrade {
    let rows: Vec<ExamGradeRow> = exams
        .iter()
        .filter(|exam| exam.subject_id == subject.id)
        .map(|exam| {
            let result = results.get(&exam.id);
            let percentage = result.and_then(|r| normalize(r.marks, exam.total_marks));
            ExamGradeRow {
                exam_id: exam.id,
                title: exam.title.clone(),
                exam_type: exam.exam_type.clone(),
                exam_date: exam.exam_date,
                total_marks: exam.total_marks,
                marks: result.map(|r| r.marks),
                percentage,
                letter: percentage.map(letter_grade),
                remarks: result.and_then(|r| r.remarks.clone()),
            }
        })
        .collect();

    let average = mean(rows.iter().filter_map(|row| row.percentage));

    SubjectGrade {
        subject_id: subject.id,
        name: subject.name.clone(),
        code: subject.code.clone(),
        exams: rows,
        average,
        letter: letter_or_na(average),
        badge: average.map(badge),
    }
}

/// 成绩单汇总
pub fn summarize(subjects: &[SubjectGrade], attendance_percentage: f64) -> ReportSummary {
    let overall_average = mean(subjects.iter().filter_map(|s| s.average));
    let graded_subjects = subjects.iter().filter(|s| s.average.is_some()).count() as u32;

    ReportSummary {
        overall_average,
        overall_grade: overall_average.map(overall_grade),
        gpa: overall_average.map(gpa),
        graded_subjects,
        attendance_percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn subject(id: i64, name: &str) -> Subject {
        Subject {
            id,
            name: name.to_string(),
            code: None,
            class_id: 1,
            teacher_id: None,
        }
    }

    fn exam(id: i64, subject_id: i64, total_marks: i32) -> Exam {
        Exam {
            id,
            title: format!("Exam {id}"),
            exam_type: "test".to_string(),
            class_id: 1,
            subject_id,
            exam_date: NaiveDate::from_ymd_opt(2025, 3, id as u32).unwrap(),
            total_marks,
            passing_marks: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn result(exam_id: i64, marks: f64) -> (i64, ExamResult) {
        (
            exam_id,
            ExamResult {
                id: exam_id,
                exam_id,
                student_id: 1,
                marks,
                remarks: None,
                recorded_at: chrono::Utc::now(),
            },
        )
    }

    #[test]
    fn test_eighty_five_of_hundred() {
        let pct = normalize(85.0, 100).unwrap();
        assert_eq!(pct, 85.0);
        assert_eq!(letter_grade(pct), LetterGrade::A);
        assert_eq!(letter_grade(pct).to_string(), "A");
        assert_eq!(badge(pct), Badge::Excellent);
    }

    #[test]
    fn test_zero_total_marks_is_skipped() {
        assert_eq!(normalize(10.0, 0), None);
        assert_eq!(normalize(10.0, -5), None);

        let math = subject(1, "Math");
        let exams = vec![exam(1, 1, 0), exam(2, 1, 50)];
        let results: HashMap<_, _> = [result(1, 10.0), result(2, 40.0)].into_iter().collect();

        let graded = grade_subject(&math, &exams, &results);
        assert_eq!(graded.exams[0].percentage, None);
        assert_eq!(graded.average, Some(80.0));
    }

    #[test]
    fn test_letter_grade_breakpoints() {
        let cases = [
            (100.0, "A+"),
            (90.0, "A+"),
            (89.99, "A"),
            (85.0, "A"),
            (80.0, "A-"),
            (75.0, "B+"),
            (70.0, "B"),
            (65.0, "C+"),
            (60.0, "C"),
            (50.0, "D"),
            (49.99, "F"),
            (0.0, "F"),
        ];
        for (pct, expected) in cases {
            assert_eq!(letter_grade(pct).to_string(), expected, "pct = {pct}");
        }
    }

    #[test]
    fn test_overall_grade_gpa_and_badge_breakpoints() {
        assert_eq!(overall_grade(90.0), OverallGrade::A);
        assert_eq!(overall_grade(89.0), OverallGrade::B);
        assert_eq!(overall_grade(70.0), OverallGrade::C);
        assert_eq!(overall_grade(60.0), OverallGrade::D);
        assert_eq!(overall_grade(59.0), OverallGrade::F);

        assert_eq!(gpa(95.0), 4.0);
        assert_eq!(gpa(86.0), 3.7);
        assert_eq!(gpa(81.0), 3.3);
        assert_eq!(gpa(76.0), 3.0);
        assert_eq!(gpa(71.0), 2.7);
        assert_eq!(gpa(66.0), 2.3);
        assert_eq!(gpa(61.0), 2.0);
        assert_eq!(gpa(55.0), 1.0);
        assert_eq!(gpa(10.0), 0.0);

        assert_eq!(badge(80.0), Badge::Excellent);
        assert_eq!(badge(79.9), Badge::Good);
        assert_eq!(badge(60.0), Badge::Average);
        assert_eq!(badge(59.9), Badge::Poor);
    }

    #[test]
    fn test_overall_is_mean_of_subject_averages() {
        let math = subject(1, "Math");
        let science = subject(2, "Science");
        // 数学三场平均 80，科学一场 60
        let exams = vec![exam(1, 1, 100), exam(2, 1, 100), exam(3, 1, 100), exam(4, 2, 100)];
        let results: HashMap<_, _> = [
            result(1, 70.0),
            result(2, 80.0),
            result(3, 90.0),
            result(4, 60.0),
        ]
        .into_iter()
        .collect();

        let subjects = vec![
            grade_subject(&math, &exams, &results),
            grade_subject(&science, &exams, &results),
        ];
        assert_eq!(subjects[0].average, Some(80.0));
        assert_eq!(subjects[1].average, Some(60.0));

        let summary = summarize(&subjects, 0.0);
        assert_eq!(summary.overall_average, Some(70.0));
        assert_eq!(summary.overall_grade, Some(OverallGrade::C));
        assert_eq!(summary.gpa, Some(2.7));
        assert_eq!(summary.graded_subjects, 2);
    }

    #[test]
    fn test_ungraded_exams_and_subjects_are_excluded() {
        let math = subject(1, "Math");
        let art = subject(2, "Art");
        let exams = vec![exam(1, 1, 100), exam(2, 1, 100), exam(3, 2, 100)];
        let results: HashMap<_, _> = [result(1, 90.0)].into_iter().collect();

        let subjects = vec![
            grade_subject(&math, &exams, &results),
            grade_subject(&art, &exams, &results),
        ];
        assert_eq!(subjects[0].average, Some(90.0));
        assert_eq!(subjects[0].exams.len(), 2);
        assert_eq!(subjects[0].exams[1].marks, None);

        assert_eq!(subjects[1].average, None);
        assert_eq!(subjects[1].letter, NOT_AVAILABLE);
        assert_eq!(subjects[1].badge, None);

        let summary = summarize(&subjects, 100.0);
        assert_eq!(summary.overall_average, Some(90.0));
        assert_eq!(summary.graded_subjects, 1);
    }

    #[test]
    fn test_no_data_is_not_zero() {
        let summary = summarize(&[], 0.0);
        assert_eq!(summary.overall_average, None);
        assert_eq!(summary.overall_grade, None);
        assert_eq!(summary.gpa, None);
        assert_eq!(letter_or_na(None), "N/A");

        let math = subject(1, "Math");
        let zero = grade_subject(&math, &[exam(1, 1, 100)], &[result(1, 0.0)].into_iter().collect());
        assert_eq!(zero.average, Some(0.0));
        assert_eq!(zero.letter, "F");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean([1.0, 2.0, 3.0]), Some(2.0));
    }
}
