//! Command dispatch: bridges CLI args -> controller flows -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod courses;
pub mod lessons;
pub mod profile;
pub mod progress;
pub mod util;

use odyssey_core::{Controller, GuardDecision, Route};

use crate::cli::{Command, CoursesCommand, LessonCommand};
use crate::error::CliError;
use crate::output::OutputOpts;

/// Route whose guard a command must pass, if any.
fn route_for(cmd: &Command) -> Option<Route> {
    match cmd {
        Command::Dashboard | Command::Progress => Some(Route::Dashboard),
        Command::Profile(_) => Some(Route::Profile),
        Command::Lesson(args) => match &args.command {
            LessonCommand::Show {
                course_id,
                lesson_id,
            }
            | LessonCommand::Complete {
                course_id,
                lesson_id,
            } => Some(Route::Lesson {
                course_id: course_id.clone(),
                lesson_id: lesson_id.clone(),
            }),
        },
        Command::Courses(args) => match &args.command {
            CoursesCommand::List { .. } => Some(Route::Courses),
            CoursesCommand::Show { id }
            | CoursesCommand::Lessons { id }
            | CoursesCommand::Enroll { id } => Some(Route::Course {
                course_id: id.clone(),
            }),
        },
        _ => None,
    }
}

/// Wait for the session to resolve, then apply the route guard.
async fn ensure_access(controller: &Controller, route: &Route) -> Result<(), CliError> {
    match controller.authorize(route).await {
        GuardDecision::Render => Ok(()),
        GuardDecision::Redirect { .. } | GuardDecision::Wait => {
            tracing::debug!(%route, "guard redirected to login");
            Err(CliError::NotLoggedIn)
        }
    }
}

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    // Login and register establish a session rather than resume one.
    if !matches!(cmd, Command::Login(_) | Command::Register(_) | Command::Logout) {
        controller.restore_session().await;
    }
    if let Some(route) = route_for(&cmd) {
        ensure_access(controller, &route).await?;
    }

    match cmd {
        Command::Login(args) => auth::login(controller, args, opts).await,
        Command::Register(args) => auth::register(controller, args, opts).await,
        Command::Logout => auth::logout(controller, opts),
        Command::Whoami => auth::whoami(controller, opts),
        Command::Courses(args) => courses::handle(controller, args, opts).await,
        Command::Lesson(args) => lessons::handle(controller, args, opts).await,
        Command::Progress => progress::show(controller, opts).await,
        Command::Dashboard => progress::dashboard(controller, opts).await,
        Command::Profile(args) => profile::handle(controller, args, opts).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{CoursesArgs, ProfileArgs, ProfileCommand};

    #[test]
    fn protected_commands_map_to_protected_routes() {
        let profile = Command::Profile(ProfileArgs {
            command: ProfileCommand::Show,
        });
        assert!(route_for(&profile).is_some_and(|r| r.is_protected()));
        assert!(route_for(&Command::Dashboard).is_some_and(|r| r.is_protected()));

        let list = Command::Courses(CoursesArgs {
            command: CoursesCommand::List {
                level: None,
                tech: None,
            },
        });
        assert!(route_for(&list).is_some_and(|r| !r.is_protected()));
        assert!(route_for(&Command::Whoami).is_none());
    }
}
