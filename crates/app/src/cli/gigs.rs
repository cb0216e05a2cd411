use std::path::PathBuf;

use clap::{Args, Subcommand};

use freehub_common::{Result, ScreenScope};
use freehub_domain::{Gig, PendingFile};
use freehub_gigs::{AttachmentList, GigForm};

use super::guarded;
use crate::Freehub;

#[derive(Debug, Args)]
pub(crate) struct GigsCommand {
    #[command(subcommand)]
    command: GigsSubcommand,
}

#[derive(Debug, Subcommand)]
enum GigsSubcommand {
    /// List your gigs with completion stats
    List,
    /// Show one gig
    Show { id: String },
    /// Publish a new gig
    Create(CreateGigArgs),
    /// Edit a gig's fields and images
    Edit(EditGigArgs),
    /// Delete a gig
    Delete { id: String },
    /// Mark a gig completed on this client
    Complete { id: String },
    /// List your favorite gigs
    Favorites,
}

#[derive(Debug, Args)]
struct CreateGigArgs {
    #[arg(long)]
    title: String,

    #[arg(long)]
    desc: String,

    /// Price, e.g. 49.99
    #[arg(long)]
    price: String,

    #[arg(long)]
    category: String,

    /// Image file to attach; repeat for several
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct EditGigArgs {
    id: String,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    desc: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    category: Option<String>,

    /// Position (0-based) of an existing image to remove; repeat for several
    #[arg(long = "remove-image")]
    remove_images: Vec<usize>,

    /// Image file to append; repeat for several
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Drop every existing image and keep only the new ones
    #[arg(long)]
    replace_images: bool,
}

pub(crate) async fn run(app: &Freehub, scope: &ScreenScope, command: GigsCommand) -> Result<()> {
    match command.command {
        GigsSubcommand::List => list(app, scope).await,
        GigsSubcommand::Show { id } => show(app, scope, &id).await,
        GigsSubcommand::Create(args) => create(app, scope, args).await,
        GigsSubcommand::Edit(args) => edit(app, scope, args).await,
        GigsSubcommand::Delete { id } => delete(app, scope, &id).await,
        GigsSubcommand::Complete { id } => complete(app, scope, &id).await,
        GigsSubcommand::Favorites => favorites(app, scope).await,
    }
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<PendingFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(PendingFile::from_path(path).await?);
    }
    Ok(files)
}

fn print_summary(gig: &Gig) {
    println!(
        "{}\t{}\t{}\t{}\t{} image(s)",
        gig.id,
        gig.status,
        gig.price,
        gig.title,
        gig.images.len()
    );
}

fn print_detail(gig: &Gig, asset_url: &str) {
    println!("id: {}", gig.id);
    println!("title: {}", gig.title);
    println!("description: {}", gig.desc);
    println!("price: {}", gig.price);
    println!("category: {}", gig.category);
    println!("status: {}", gig.status);
    println!("views: {}", gig.views);
    if let Some(rating) = gig.rating {
        println!("rating: {:.1} ({} reviews)", rating, gig.review_count);
    }
    if let Some(days) = gig.delivery_time {
        println!("delivery_days: {}", days);
    }
    for (index, url) in gig.image_urls(asset_url).iter().enumerate() {
        println!("image[{}]: {}", index, url);
    }
}

async fn list(app: &Freehub, scope: &ScreenScope) -> Result<()> {
    let Some(gigs) = guarded(scope, app.gigs.list()).await? else {
        return Ok(());
    };
    for gig in &gigs {
        print_summary(gig);
    }
    let stats = app.gigs.stats();
    println!(
        "total: {}  completed: {}  success_rate: {}%",
        stats.total, stats.completed, stats.success_rate
    );
    Ok(())
}

async fn show(app: &Freehub, scope: &ScreenScope, id: &str) -> Result<()> {
    let Some(gig) = guarded(scope, app.gigs.fetch_one(id)).await? else {
        return Ok(());
    };
    print_detail(&gig, &app.config.asset_url);
    Ok(())
}

async fn create(app: &Freehub, scope: &ScreenScope, args: CreateGigArgs) -> Result<()> {
    let form = GigForm::new(args.title, args.desc, args.price, args.category);
    let mut attachments = AttachmentList::new();
    attachments.add_files(read_files(&args.images).await?);

    let created = guarded(scope, app.gigs.create(form, &attachments)).await;
    attachments.teardown();

    if let Some(gig) = created? {
        println!("created: {}", gig.id);
        print_detail(&gig, &app.config.asset_url);
    }
    Ok(())
}

async fn edit(app: &Freehub, scope: &ScreenScope, args: EditGigArgs) -> Result<()> {
    let Some(current) = guarded(scope, app.gigs.fetch_one(&args.id)).await? else {
        return Ok(());
    };

    let mut form = GigForm::from_gig(&current);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(desc) = args.desc {
        form.desc = desc;
    }
    if let Some(price) = args.price {
        form.price = price;
    }
    if let Some(category) = args.category {
        form.category = category;
    }

    let mut attachments = AttachmentList::from_remote(current.images.clone());
    let mut removals = args.remove_images;
    // Highest first so earlier positions stay valid
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        if attachments.remove(index).is_none() {
            tracing::warn!(index, "No image at that position");
        }
    }
    attachments.add_files(read_files(&args.images).await?);

    let plan = if args.replace_images {
        attachments.replacement_plan()
    } else {
        attachments.image_plan()
    };
    let updated = guarded(scope, app.gigs.update_with_plan(&args.id, form, plan)).await;
    attachments.teardown();

    if let Some(gig) = updated? {
        println!("updated: {}", gig.id);
        print_detail(&gig, &app.config.asset_url);
    }
    Ok(())
}

async fn delete(app: &Freehub, scope: &ScreenScope, id: &str) -> Result<()> {
    if guarded(scope, app.gigs.remove(id)).await?.is_some() {
        println!("deleted: {}", id);
    }
    Ok(())
}

async fn complete(app: &Freehub, scope: &ScreenScope, id: &str) -> Result<()> {
    // The completion applies to the listing, so load it first
    if guarded(scope, app.gigs.list()).await?.is_none() {
        return Ok(());
    }
    let gig = app.gigs.mark_complete(id)?;
    println!("completed: {} (saved on this client)", gig.id);
    let stats = app.gigs.stats();
    println!("success_rate: {}%", stats.success_rate);
    Ok(())
}

async fn favorites(app: &Freehub, scope: &ScreenScope) -> Result<()> {
    let Some(gigs) = guarded(scope, app.gigs.favorites()).await? else {
        return Ok(());
    };
    if gigs.is_empty() {
        println!("No favorites yet");
    }
    for gig in &gigs {
        print_summary(gig);
    }
    Ok(())
}
