// Catalog courses as learning-path items.
//
// Course levels and durations are free text ("Beginner level",
// "1 week at 10 hours a week"), so both are read leniently.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::CourseRecord;

static WEEKLY_LOAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*(week|month)s?\s+at\s+(\d+)\s*hours?\s+a\s+week").unwrap()
});

static PLAIN_HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s*hours?").unwrap());

static PLAIN_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(week|month|day)s?").unwrap());

/// Approximate study hours for a course duration string.
///
/// A month counts as 4 weeks of load, or 20 hours when no weekly load is given.
/// A bare week is 5 hours and a day is 2.
pub fn parse_duration_hours(duration: &str) -> Option<u32> {
    let text = duration.trim().to_lowercase();

    if let Some(caps) = WEEKLY_LOAD.captures(&text) {
        let count: u32 = caps[1].parse().ok()?;
        let weeks = if &caps[2] == "week" { count } else { count.saturating_mul(4) };
        let per_week: u32 = caps[3].parse().ok()?;
        return Some(weeks.saturating_mul(per_week));
    }

    if let Some(caps) = PLAIN_HOURS.captures(&text) {
        return caps[1].parse().ok();
    }

    let caps = PLAIN_SPAN.captures(&text)?;
    let count: u32 = caps[1].parse().ok()?;
    let hours_per_unit = match &caps[2] {
        "day" => 2,
        "week" => 5,
        _ => 20,
    };
    Some(count.saturating_mul(hours_per_unit))
}

/// Whether a course of this level helps someone moving from `current` to `target`.
/// Unlabelled courses always qualify.
pub fn suits_levels(course_level: Option<&str>, current: u8, target: u8) -> bool {
    let level = course_level.unwrap_or("").trim().to_lowercase();
    match level.as_str() {
        "" | "n/a" => true,
        "beginner level" => current <= 2,
        "intermediate level" => current <= 4 && target >= 3,
        _ => target > 4,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningItem {
    pub order: usize,
    pub title: String,
    pub description: String,
    pub item_type: &'static str,
    pub source: &'static str,
    pub estimated_hours: u32,
    pub target_level_after: u32,
    pub success_criteria: String,
    pub resource_id: String,
    pub url: Option<String>,
    pub organization: Option<String>,
    pub difficulty: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<i64>,
    pub certificate_available: Option<bool>,
}

/// Keeps the courses that suit the level range and numbers them from 1.
pub fn course_items(courses: Vec<CourseRecord>, current: u8, target: u8) -> Vec<LearningItem> {
    courses
        .into_iter()
        .filter(|c| suits_levels(c.level.as_deref(), current, target))
        .enumerate()
        .map(|(i, course)| LearningItem {
            order: i + 1,
            title: course
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Untitled Course".to_string()),
            description: course.description.unwrap_or_default(),
            item_type: "Course",
            source: "Coursera",
            estimated_hours: course
                .duration
                .as_deref()
                .and_then(parse_duration_hours)
                .unwrap_or(0),
            target_level_after: 0,
            success_criteria: String::new(),
            resource_id: course.id.to_string(),
            url: course.url,
            organization: course.organization,
            difficulty: course.level,
            rating: course.rating,
            reviews_count: course.reviews_count,
            certificate_available: course.certificate_available,
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn course(id: i64, level: Option<&str>, duration: Option<&str>) -> CourseRecord {
    CourseRecord {
        id,
        title: Some(format!("Course {id}")),
        description: None,
        url: Some(format!("https://www.coursera.org/learn/course-{id}")),
        organization: Some("University".to_string()),
        duration: duration.map(str::to_string),
        level: level.map(str::to_string),
        rating: Some(4.7),
        reviews_count: Some(1200),
        certificate_available: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hours() {
        let cases = [
            ("6 hours to complete", Some(6)),
            ("1 hour", Some(1)),
            ("1 week at 10 hours a week", Some(10)),
            ("3 Months at 5 hours a week", Some(60)),
            ("2 weeks", Some(10)),
            ("4 days", Some(8)),
            ("2 months", Some(40)),
            ("Approx. 6 hours", None),
            ("", None),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_duration_hours(input), expected, "{input:?}");
        }
    }

    #[test]
    fn test_level_filter() {
        assert!(suits_levels(None, 5, 7));
        assert!(suits_levels(Some("N/A"), 5, 7));
        assert!(suits_levels(Some("Beginner level"), 2, 3));
        assert!(!suits_levels(Some("Beginner level"), 3, 5));
        assert!(suits_levels(Some("Intermediate level"), 4, 5));
        assert!(!suits_levels(Some("Intermediate level"), 1, 2));
        assert!(!suits_levels(Some("Intermediate level"), 5, 6));
        assert!(suits_levels(Some("Advanced level"), 3, 5));
        assert!(!suits_levels(Some("Mixed"), 1, 4));
    }

    #[test]
    fn test_course_items_number_after_filtering() {
        let mut untitled = course(3, None, Some("2 weeks"));
        untitled.title = None;
        let courses = vec![
            course(1, Some("Advanced level"), Some("6 hours to complete")),
            course(2, Some("Beginner level"), None),
            untitled,
        ];

        let items = course_items(courses, 1, 3);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].order, 1);
        assert_eq!(items[0].resource_id, "2");
        assert_eq!(items[0].estimated_hours, 0);
        assert_eq!(items[0].difficulty.as_deref(), Some("Beginner level"));
        assert_eq!(items[1].order, 2);
        assert_eq!(items[1].title, "Untitled Course");
        assert_eq!(items[1].estimated_hours, 10);
        assert_eq!(items[1].source, "Coursera");
    }
}
