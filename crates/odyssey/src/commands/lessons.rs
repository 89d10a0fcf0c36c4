//! Lesson command handlers.

use std::fmt::Write as _;

use odyssey_core::{Controller, LessonView};

use crate::cli::{LessonArgs, LessonCommand};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

fn lesson_detail(view: &LessonView, color: bool) -> String {
    let lesson = &view.lesson;
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&lesson.title, color));
    let _ = writeln!(out, "Course:    {} ({})", view.course_title, view.course_id);
    let _ = writeln!(out, "Duration:  {} min", lesson.duration);
    let _ = writeln!(out, "Status:    {}", output::completion_mark(view.completed, color));
    if let Some(ref video) = lesson.video_url {
        let _ = writeln!(out, "Video:     {video}");
    }
    if !lesson.exercises.is_empty() {
        let _ = writeln!(out, "Exercises: {}", lesson.exercises.join(", "));
    }
    if !lesson.content.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", lesson.content.trim_end());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Previous:  {}", view.previous.as_deref().unwrap_or("-"));
    let _ = write!(out, "Next:      {}", view.next.as_deref().unwrap_or("-"));
    out
}

pub async fn handle(
    controller: &Controller,
    args: LessonArgs,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        LessonCommand::Show {
            course_id,
            lesson_id,
        } => {
            let view = controller.open_lesson(&course_id, &lesson_id).await?;
            let out = output::render_single(
                &opts.format,
                &view,
                |v| lesson_detail(v, opts.color),
                |v| v.lesson.id.clone(),
            );
            output::print_output(&out, opts.quiet);
            Ok(())
        }

        LessonCommand::Complete {
            course_id,
            lesson_id,
        } => {
            let record = controller.complete_lesson(&course_id, &lesson_id).await?;
            opts.status(&format!(
                "Lesson {lesson_id} completed in course {}",
                record.course_id
            ));
            Ok(())
        }
    }
}
