use clap::Args;

use freehub_checkout::{CheckoutPolicy, ItemOutcome};
use freehub_common::{Result, ScreenScope};

use super::guarded;
use crate::Freehub;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Keep going after a failed item instead of stopping
    #[arg(long)]
    attempt_all: bool,
}

#[derive(Debug, Args)]
pub(crate) struct BuyArgs {
    gig_id: String,
}

pub(crate) async fn checkout(app: &Freehub, scope: &ScreenScope, args: CheckoutArgs) -> Result<()> {
    let report = if args.attempt_all {
        let orchestrator = app.checkout_with(CheckoutPolicy::AttemptAll);
        guarded(scope, orchestrator.checkout_cart()).await?
    } else {
        guarded(scope, app.checkout.checkout_cart()).await?
    };
    let Some(report) = report else {
        return Ok(());
    };

    for result in &report.results {
        let outcome = match &result.outcome {
            ItemOutcome::Ordered { .. } => "ordered".to_string(),
            ItemOutcome::Failed { reason } => format!("failed: {}", reason),
            ItemOutcome::NotAttempted => "not attempted".to_string(),
        };
        println!("{}\t{}\t{}", result.item.id, result.item.title, outcome);
    }
    println!("{}", report.user_message());
    if !report.cart_updated {
        eprintln!("warning: the cart could not be updated; ordered items may still be listed");
    }
    Ok(())
}

pub(crate) async fn buy(app: &Freehub, scope: &ScreenScope, args: BuyArgs) -> Result<()> {
    if let Some(redirect) = guarded(scope, app.checkout.purchase(&args.gig_id)).await? {
        println!("redirect: {}", redirect.url);
    }
    Ok(())
}
