//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! echo "$PASSWORD" | ticklist login -e ada@example.com
//! TICKLIST_PASSWORD=secret ticklist register -n "Ada" -e ada@example.com
//! ticklist status
//! ticklist logout
//! ```

use ticklist_client::{App, Route};

use super::{CliError, read_password, require_session, view_failure};
use crate::render;

/// Sign in and persist the token.
pub async fn login(app: &App, email: &str) -> Result<(), CliError> {
    if app.start().await? == Route::Todo {
        render::notice("Already signed in.");
        return Ok(());
    }

    let password = read_password()?;
    let mut view = app.login_view();

    match view.submit(email, password).await {
        Ok(()) => {
            tracing::info!(route = %app.current_route(), "Login complete");
            render::notice(&format!("Signed in as {}.", email.trim()));
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}

/// Create an account. Does not sign in.
///
/// Like the registration screen, the confirmation stays up for the
/// configured redirect delay before the client moves on to `/login`.
pub async fn register(app: &App, name: &str, email: &str) -> Result<(), CliError> {
    if app.start().await? == Route::Todo {
        render::notice("Already signed in. Run `ticklist logout` to register another account.");
        return Ok(());
    }

    let password = read_password()?;
    let mut view = app.register_view();

    if let Err(e) = view.submit(name, email, password).await.map(|_| ()) {
        return Err(view_failure(view.error(), e));
    }

    if let Some(user) = view.registered_user() {
        render::user(user);
    }
    if let Some(message) = view.confirmation() {
        render::notice(message);
    }

    view.redirect_to_login().await;
    tracing::info!(route = %app.current_route(), "Registration complete");
    render::notice(&format!("Sign in with `ticklist login -e {}`.", email.trim()));
    Ok(())
}

/// Forget the stored token.
pub async fn logout(app: &App) -> Result<(), CliError> {
    app.start().await?;
    app.todo_view().logout().await?;
    render::notice("Signed out.");
    Ok(())
}

/// Print the session state and where the client would land.
pub async fn status(app: &App) -> Result<(), CliError> {
    let route = app.start().await?;
    let state = app.session_state().await;
    render::status(app.config(), state, route);
    Ok(())
}

/// Print the signed-in user.
pub async fn profile(app: &App) -> Result<(), CliError> {
    require_session(app).await?;

    let mut view = app.todo_view();
    match view.load_profile().await {
        Ok(user) => {
            render::user(user);
            Ok(())
        }
        Err(e) => Err(view_failure(view.error(), e)),
    }
}
