//! `bookshare session` - who is signed in and what the next search starts from

use super::Context;
use anyhow::{bail, Result};
use bookshare_cli::output::Status;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand, Debug, Clone)]
pub enum SessionAction {
    /// Show the stored session
    Show,

    /// Record a signed-in user
    SignIn {
        /// Backend user id
        user_id: String,

        /// Name used in greetings
        #[arg(long)]
        name: Option<String>,
    },

    /// Forget the signed-in user
    SignOut,
}

/// Run a session action against the session file
pub fn run(ctx: &Context, action: SessionAction) -> Result<()> {
    let store = ctx.session()?;

    match action {
        SessionAction::Show => {
            let session = store.get();
            if ctx.json {
                return super::print_json(&json!({
                    "path": store.path(),
                    "signed_in": session.is_signed_in(),
                    "session": session,
                }));
            }

            Status::header(&format!("Session ({})", store.path().display()));
            match &session.user_id {
                Some(user_id) => Status::info(&format!("Signed in as {} ({user_id})", session.greeting_name())),
                None => Status::info("Not signed in"),
            }
            if let Some(km) = session.radius_km {
                Status::info(&format!("Next search radius: {km} km"));
            }
        }

        SessionAction::SignIn { user_id, name } => {
            let user_id = user_id.trim().to_string();
            if user_id.is_empty() {
                bail!(bookshare_locator::LocatorError::Validation("user id cannot be empty".into()));
            }
            store.update(|s| s.sign_in(user_id, name));
            store.save()?;
            if !ctx.json {
                Status::success(&format!("Welcome, {}", store.get().greeting_name()));
            }
        }

        SessionAction::SignOut => {
            store.update(|s| s.sign_out());
            store.save()?;
            if !ctx.json {
                Status::success("Signed out");
            }
        }
    }

    Ok(())
}
