use clap::{Args, Subcommand};

use freehub_common::{Result, ScreenScope};

use super::guarded;
use crate::Freehub;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a gig to the cart
    Add { gig_id: String },
    /// Remove a gig from the cart
    Remove { gig_id: String },
    /// Show the cart
    List,
    /// Empty the cart
    Clear,
}

pub(crate) async fn run(app: &Freehub, scope: &ScreenScope, command: CartCommand) -> Result<()> {
    match command.command {
        CartSubcommand::Add { gig_id } => {
            let Some(gig) = guarded(scope, app.gigs.fetch_one(&gig_id)).await? else {
                return Ok(());
            };
            app.cart.add_gig(&gig)?;
            println!("added: {} ({})", gig.title, gig.price);
        }
        CartSubcommand::Remove { gig_id } => {
            if app.cart.remove(&gig_id)? {
                println!("removed: {}", gig_id);
            } else {
                println!("not in cart: {}", gig_id);
            }
        }
        CartSubcommand::List => {
            let items = app.cart.list()?;
            if items.is_empty() {
                println!("Cart is empty");
                return Ok(());
            }
            for item in &items {
                println!("{}\t{}\t{}", item.id, item.price, item.title);
            }
            println!("total: {}", app.cart.total()?);
        }
        CartSubcommand::Clear => {
            app.cart.clear()?;
            println!("cart cleared");
        }
    }
    Ok(())
}
