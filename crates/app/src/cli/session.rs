use clap::Args;

use freehub_common::{Result, ScreenScope};

use super::guarded;
use crate::Freehub;

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "FREEHUB_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn login(app: &Freehub, scope: &ScreenScope, args: LoginArgs) -> Result<()> {
    let Some(outcome) = guarded(scope, app.auth.login(&args.email, &args.password)).await? else {
        return Ok(());
    };

    println!("logged_in: {}", outcome.session.user.email);
    println!("role: {}", outcome.session.role());
    println!("route: {}", outcome.route);
    Ok(())
}

pub(crate) fn logout(app: &Freehub) -> Result<()> {
    let route = app.auth.logout()?;
    println!("logged_out: true");
    println!("route: {}", route);
    Ok(())
}

pub(crate) fn whoami(app: &Freehub) -> Result<()> {
    let session = app.credentials.require_session()?;
    println!("id: {}", session.user.id);
    println!("name: {}", session.user.name);
    println!("email: {}", session.user.email);
    println!("role: {}", session.role());
    Ok(())
}
