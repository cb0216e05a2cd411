use std::future::Future;

use clap::{Parser, Subcommand};

use freehub_common::{Result, ScreenScope};

use crate::Freehub;

mod cart;
mod checkout;
mod gigs;
mod session;

#[derive(Debug, Parser)]
#[command(name = "freehub", about = "Freehub marketplace client", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and store the session
    Login(session::LoginArgs),
    /// Clear the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage gigs
    Gigs(gigs::GigsCommand),
    /// Manage the local cart
    Cart(cart::CartCommand),
    /// Order every item in the cart
    Checkout(checkout::CheckoutArgs),
    /// Start a checkout session for one gig
    Buy(checkout::BuyArgs),
}

impl Cli {
    pub async fn run(self, app: &Freehub, scope: &ScreenScope) -> Result<()> {
        match self.command {
            Commands::Login(args) => session::login(app, scope, args).await,
            Commands::Logout => session::logout(app),
            Commands::Whoami => session::whoami(app),
            Commands::Gigs(command) => gigs::run(app, scope, command).await,
            Commands::Cart(command) => cart::run(app, scope, command).await,
            Commands::Checkout(args) => checkout::checkout(app, scope, args).await,
            Commands::Buy(args) => checkout::buy(app, scope, args).await,
        }
    }
}

/// Await `request` on behalf of the current screen.
///
/// `Ok(None)` means the screen was torn down while the request was in flight
/// and its result has been dropped.
async fn guarded<T, F>(scope: &ScreenScope, request: F) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    match scope.apply(request).await {
        Some(result) => result.map(Some),
        None => {
            eprintln!("Interrupted; the response was discarded");
            Ok(None)
        }
    }
}
