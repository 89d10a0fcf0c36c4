//! Course catalog command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use odyssey_core::{Controller, Course, CourseView, CoursesState, Lesson};

use crate::cli::{CoursesArgs, CoursesCommand};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Lessons")]
    lessons: usize,
    #[tabled(rename = "Students")]
    students: u32,
    #[tabled(rename = "Rating")]
    rating: String,
}

impl From<&Course> for CourseRow {
    fn from(c: &Course) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            level: c.level.map(|l| l.to_string()).unwrap_or_default(),
            lessons: c.lesson_count(),
            students: c.enrolled_count,
            rating: format!("{:.1}", c.rating),
        }
    }
}

#[derive(Tabled)]
struct LessonRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Minutes")]
    duration: u32,
    #[tabled(rename = "Exercises")]
    exercises: usize,
}

impl From<&Lesson> for LessonRow {
    fn from(l: &Lesson) -> Self {
        Self {
            id: l.id.clone(),
            title: l.title.clone(),
            duration: l.duration,
            exercises: l.exercises.len(),
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

fn matches_filters(course: &Course, level: Option<&str>, tech: Option<&str>) -> bool {
    let level_ok = level.is_none_or(|want| {
        course
            .level
            .is_some_and(|l| l.to_string().eq_ignore_ascii_case(want))
    });
    let tech_ok = tech.is_none_or(|want| {
        course
            .technologies
            .iter()
            .any(|t| t.eq_ignore_ascii_case(want))
    });
    level_ok && tech_ok
}

// ── Detail view ─────────────────────────────────────────────────────

fn course_detail(view: &CourseView, color: bool) -> String {
    let c = &view.course;
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&c.title, color));
    if !c.description.is_empty() {
        let _ = writeln!(out, "{}", c.description);
    }
    let _ = writeln!(out);
    if let Some(level) = c.level {
        let _ = writeln!(out, "Level:        {level}");
    }
    if let Some(ref instructor) = c.instructor {
        let _ = writeln!(out, "Instructor:   {}", instructor.name);
    }
    if !c.technologies.is_empty() {
        let _ = writeln!(out, "Technologies: {}", c.technologies.join(", "));
    }
    let _ = writeln!(out, "Rating:       {:.1} ({} students)", c.rating, c.enrolled_count);
    let enrolled = if view.enrolled { "yes" } else { "no" };
    let _ = writeln!(out, "Enrolled:     {enrolled}");
    let last = view.progress.as_ref().and_then(|p| p.lesson_id.as_deref());

    for module in &c.modules {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", output::heading(&module.title, color));
        for lesson in &module.lessons {
            let marker = if Some(lesson.id.as_str()) == last {
                "▶"
            } else {
                " "
            };
            let _ = writeln!(
                out,
                " {marker} {:<12} {} ({} min)",
                lesson.id, lesson.title, lesson.duration
            );
        }
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: CoursesArgs,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        CoursesCommand::List { level, tech } => {
            let pb = output::spinner("Loading courses...", opts.quiet);
            let watcher = output::spin_while_loading(
                controller.store().subscribe_courses(),
                pb.clone(),
                CoursesState::is_loading,
            );
            let result = controller.load_catalog().await;
            watcher.abort();
            pb.finish_and_clear();
            let all = result?;
            let courses: Vec<Course> = all
                .into_iter()
                .filter(|c| matches_filters(c, level.as_deref(), tech.as_deref()))
                .collect();
            let out = output::render_list(
                &opts.format,
                &courses,
                |c| CourseRow::from(c),
                |c| c.id.clone(),
            );
            output::print_output(&out, opts.quiet);
            Ok(())
        }

        CoursesCommand::Show { id } => {
            let view = controller.open_course(&id).await?;
            let out = output::render_single(
                &opts.format,
                &view,
                |v| course_detail(v, opts.color),
                |v| v.course.id.clone(),
            );
            output::print_output(&out, opts.quiet);
            Ok(())
        }

        CoursesCommand::Lessons { id } => {
            let lessons = controller.course_lessons(&id).await?;
            let out = output::render_list(&opts.format, &lessons, |l| LessonRow::from(l), |l| {
                l.id.clone()
            });
            output::print_output(&out, opts.quiet);
            Ok(())
        }

        CoursesCommand::Enroll { id } => {
            let record = controller.enroll(&id).await?;
            opts.status(&format!("Enrolled in course {}", record.course_id));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odyssey_core::CourseLevel;

    fn course(level: Option<CourseLevel>, tech: &[&str]) -> Course {
        Course {
            id: "c1".into(),
            title: "Rust".into(),
            description: String::new(),
            level,
            technologies: tech.iter().map(|t| (*t).to_owned()).collect(),
            modules: Vec::new(),
            enrolled_count: 0,
            rating: 0.0,
            instructor: None,
        }
    }

    #[test]
    fn filters_are_case_insensitive() {
        let c = course(Some(CourseLevel::Beginner), &["Rust", "WASM"]);
        assert!(matches_filters(&c, Some("BEGINNER"), Some("wasm")));
        assert!(!matches_filters(&c, Some("advanced"), None));
        assert!(matches_filters(&c, None, None));
    }

    #[test]
    fn unknown_level_fails_level_filter() {
        let c = course(None, &[]);
        assert!(!matches_filters(&c, Some("beginner"), None));
    }
}
