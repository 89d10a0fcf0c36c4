//! Progress and dashboard command handlers.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use tabled::Tabled;

use odyssey_core::{Controller, Course, CoursesState, Dashboard, ProgressRecord, ProgressState};

use crate::error::CliError;
use crate::output::{self, OutputOpts};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProgressRow {
    #[tabled(rename = "Course")]
    course_id: String,
    #[tabled(rename = "Last Lesson")]
    lesson_id: String,
    #[tabled(rename = "Modules Done")]
    modules: String,
    #[tabled(rename = "Exercises")]
    exercises: usize,
    #[tabled(rename = "Last Activity")]
    completed_at: String,
    #[tabled(rename = "Certificate")]
    certificate: String,
}

impl From<&ProgressRecord> for ProgressRow {
    fn from(p: &ProgressRecord) -> Self {
        let done = p.modules_progress.iter().filter(|m| m.completed).count();
        Self {
            course_id: p.course_id.clone(),
            lesson_id: p.lesson_id.clone().unwrap_or_else(|| "-".into()),
            modules: format!("{done}/{}", p.modules_progress.len()),
            exercises: p.exercises_completed.len(),
            completed_at: p.completed_at.map(format_time).unwrap_or_else(|| "-".into()),
            certificate: if p.certificate_issued { "yes" } else { "no" }.into(),
        }
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

// ── Dashboard view ──────────────────────────────────────────────────

fn course_lines(out: &mut String, courses: &[Course]) {
    if courses.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }
    for c in courses {
        let level = c.level.map(|l| l.to_string()).unwrap_or_default();
        let _ = writeln!(out, "  {:<12} {} [{level}]", c.id, c.title);
    }
}

fn dashboard_detail(d: &Dashboard, color: bool) -> String {
    let s = &d.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&format!("Welcome back, {}", d.user.name), color));
    let _ = writeln!(out);
    let _ = writeln!(out, "Enrolled:    {}", s.courses_enrolled);
    let _ = writeln!(out, "Completed:   {}", s.courses_completed);
    let _ = writeln!(out, "Exercises:   {}", s.exercises_completed);
    let _ = writeln!(out, "Points:      {}", s.total_points);
    let _ = writeln!(out, "Streak:      {} days", s.streak);
    let _ = writeln!(out, "Avg. score:  {:.1}", s.average_score);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::heading("Your courses", color));
    course_lines(&mut out, &d.enrolled);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", output::heading("Recommended", color));
    course_lines(&mut out, &d.recommended);
    out.trim_end().to_owned()
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn show(controller: &Controller, opts: &OutputOpts) -> Result<(), CliError> {
    let pb = output::spinner("Loading progress...", opts.quiet);
    let watcher = output::spin_while_loading(
        controller.store().subscribe_progress(),
        pb.clone(),
        ProgressState::is_loading,
    );
    let result = controller.load_progress().await;
    watcher.abort();
    pb.finish_and_clear();
    let records = result?;
    let out = output::render_list(
        &opts.format,
        &records,
        |p| ProgressRow::from(p),
        |p| p.course_id.clone(),
    );
    output::print_output(&out, opts.quiet);
    Ok(())
}

pub async fn dashboard(controller: &Controller, opts: &OutputOpts) -> Result<(), CliError> {
    let pb = output::spinner("Loading dashboard...", opts.quiet);
    let watcher = output::spin_while_loading(
        controller.store().subscribe_courses(),
        pb.clone(),
        CoursesState::is_loading,
    );
    let result = controller.load_dashboard().await;
    watcher.abort();
    pb.finish_and_clear();
    let dash = result?;

    let out = output::render_single(
        &opts.format,
        &dash,
        |d| dashboard_detail(d, opts.color),
        |d| {
            d.recommended
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, opts.quiet);
    Ok(())
}
