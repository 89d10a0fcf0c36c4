//! Clap derive structures for the `odyssey` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// odyssey -- learn to code from your terminal
#[derive(Debug, Parser)]
#[command(
    name = "odyssey",
    version,
    about = "Browse courses, follow lessons, and track progress on CodeOdyssey",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// API root URL (overrides config)
    #[arg(long, env = "ODYSSEY_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format (overrides config)
    #[arg(long, short = 'o', env = "ODYSSEY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "ODYSSEY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "ODYSSEY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with email and password
    Login(LoginArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Forget the stored session token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Browse the course catalog
    #[command(alias = "c")]
    Courses(CoursesArgs),

    /// Read and complete lessons
    #[command(alias = "l")]
    Lesson(LessonArgs),

    /// Show progress across enrolled courses
    Progress,

    /// Stats, enrolled courses, and recommendations
    #[command(alias = "dash")]
    Dashboard,

    /// View and edit your profile
    Profile(ProfileArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "ODYSSEY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Password (prompted twice when omitted)
    #[arg(long, env = "ODYSSEY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Accept the terms of use
    #[arg(long)]
    pub accept_terms: bool,
}

// ── Courses ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CoursesArgs {
    #[command(subcommand)]
    pub command: CoursesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CoursesCommand {
    /// List the catalog
    #[command(alias = "ls")]
    List {
        /// Only courses at this level
        #[arg(long)]
        level: Option<String>,

        /// Only courses mentioning this technology
        #[arg(long, short = 't')]
        tech: Option<String>,
    },

    /// Show a course with its modules and lessons
    Show {
        /// Course ID
        id: String,
    },

    /// List a course's lessons in order
    Lessons {
        /// Course ID
        id: String,
    },

    /// Enroll in a course
    Enroll {
        /// Course ID
        id: String,
    },
}

// ── Lessons ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LessonArgs {
    #[command(subcommand)]
    pub command: LessonCommand,
}

#[derive(Debug, Subcommand)]
pub enum LessonCommand {
    /// Show lesson content
    Show {
        /// Course ID
        course_id: String,
        /// Lesson ID
        lesson_id: String,
    },

    /// Mark a lesson as completed
    Complete {
        /// Course ID
        course_id: String,
        /// Lesson ID
        lesson_id: String,
    },
}

// ── Profile ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Show your profile
    Show,

    /// Update name, email, or bio
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        bio: Option<String>,
    },

    /// Change your password (prompts for current and new)
    Password,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
