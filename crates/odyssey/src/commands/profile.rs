//! Profile command handlers.

use std::fmt::Write as _;

use odyssey_core::{Controller, PasswordChangeForm, ProfileForm, UserProfile};

use crate::cli::{ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

fn profile_detail(p: &UserProfile, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", output::heading(&p.name, color));
    let _ = writeln!(out, "ID:          {}", p.id);
    let _ = writeln!(out, "Email:       {}", p.email);
    if let Some(role) = p.role {
        let _ = writeln!(out, "Role:        {role}");
    }
    if let Some(ref bio) = p.bio {
        let _ = writeln!(out, "Bio:         {bio}");
    }
    if let Some(created) = p.created_at {
        let _ = writeln!(out, "Joined:      {}", created.format("%Y-%m-%d"));
    }
    if let Some(last) = p.last_login {
        let _ = writeln!(out, "Last login:  {}", last.format("%Y-%m-%d %H:%M"));
    }
    for link in &p.social_links {
        let _ = writeln!(out, "{:<12} {}", format!("{}:", link.kind), link.url);
    }
    out.trim_end().to_owned()
}

/// Start from the stored profile and overlay whatever flags were given.
fn merge_form(
    current: &UserProfile,
    name: Option<String>,
    email: Option<String>,
    bio: Option<String>,
) -> ProfileForm {
    ProfileForm {
        name: name.unwrap_or_else(|| current.name.clone()),
        email: email.unwrap_or_else(|| current.email.clone()),
        bio: bio.or_else(|| current.bio.clone()),
        preferences: None,
    }
}

pub async fn handle(
    controller: &Controller,
    args: ProfileArgs,
    opts: &OutputOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Show => {
            let profile = controller.profile().await?;
            let out = output::render_single(
                &opts.format,
                &profile,
                |p| profile_detail(p, opts.color),
                |p| p.email.clone(),
            );
            output::print_output(&out, opts.quiet);
            Ok(())
        }

        ProfileCommand::Update { name, email, bio } => {
            if name.is_none() && email.is_none() && bio.is_none() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "pass at least one of --name, --email, --bio".into(),
                });
            }
            let current = controller.profile().await?;
            let form = merge_form(&current, name, email, bio);
            let updated = controller.update_profile(&form).await?;
            opts.status(&format!("Profile updated for {}", updated.email));
            Ok(())
        }

        ProfileCommand::Password => {
            let form = PasswordChangeForm {
                current: util::prompt_secret("Current password")?,
                new_password: util::prompt_secret("New password")?,
                confirm: util::prompt_secret("Confirm new password")?,
            };
            controller.change_password(&form).await?;
            opts.status("Password changed");
            Ok(())
        }
    }
}
