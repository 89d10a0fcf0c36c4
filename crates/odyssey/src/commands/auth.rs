//! Session command handlers: login, register, logout, whoami.

use secrecy::SecretString;
use tabled::Tabled;

use odyssey_core::{Controller, LoginForm, RegistrationForm, SessionState, User};

use crate::cli::{LoginArgs, RegisterArgs};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

// ── Detail view ─────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(
    controller: &Controller,
    args: LoginArgs,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    let form = LoginForm {
        email: util::text_or_prompt(args.email, "Email")?,
        password: util::secret_or_prompt(args.password, "Password")?,
    };

    let pb = output::spinner("Signing in...", opts.quiet);
    let watcher = output::spin_while_loading(
        controller.store().subscribe_session(),
        pb.clone(),
        SessionState::is_loading,
    );
    let result = controller.login(&form).await;
    watcher.abort();
    pb.finish_and_clear();
    let user = result?;
    opts.status(&format!("Logged in as {} <{}>", user.name, user.email));
    Ok(())
}

pub async fn register(
    controller: &Controller,
    args: RegisterArgs,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    let (password, confirm_password) = match args.password {
        Some(p) => {
            let p = SecretString::from(p);
            (p.clone(), p)
        }
        None => (
            util::prompt_secret("Password")?,
            util::prompt_secret("Confirm password")?,
        ),
    };
    let accept_terms =
        args.accept_terms || util::confirm("Do you accept the terms of use?", opts.yes)?;

    let form = RegistrationForm {
        name: args.name,
        email: args.email,
        password,
        confirm_password,
        accept_terms,
    };

    let user = controller.register(&form).await?;
    opts.status(&format!("Welcome, {}! Your account is ready.", user.name));
    Ok(())
}

pub fn logout(controller: &Controller, opts: &OutputOpts) -> Result<(), CliError> {
    controller.logout()?;
    opts.status("Logged out");
    Ok(())
}

pub fn whoami(controller: &Controller, opts: &OutputOpts) -> Result<(), CliError> {
    let session = controller.session();
    let user = session.user().ok_or(CliError::NotLoggedIn)?;
    let out = output::render_single(
        &opts.format,
        user,
        |u| output::render_table(&[UserRow::from(u)]),
        |u| u.email.clone(),
    );
    output::print_output(&out, opts.quiet);
    Ok(())
}

