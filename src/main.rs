use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};

use photo_stickers::app::{Application, DesktopHost, HostContext, Session, SessionEvent};
use photo_stickers::config::{Config, StickerPickPolicy};
use photo_stickers::geometry::Rect;
use photo_stickers::logging;
use photo_stickers::model::StickerId;
use photo_stickers::services::FileImagePicker;
use photo_stickers::ui::edit_sticker::{DismissReason, EditStickerIntent};
use photo_stickers::ui::sticker_browser::StickerBrowserIntent;
use photo_stickers::ui::PresentationStyle;

#[derive(Parser, Debug)]
#[command(name = "photo-stickers", version, about = "Create and pick photo stickers")]
struct Cli {
    /// Config file (default: ~/.config/photo-stickers/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a sticker from an image file.
    Add {
        /// Source image (PNG or JPEG).
        image: PathBuf,
        /// Crop rectangle `x,y,width,height` (default: largest centered square).
        #[arg(long)]
        crop: Option<Rect>,
    },
    /// List stickers that have a rendered image.
    List,
    /// Re-crop a sticker and render it again.
    Edit {
        id: StickerId,
        /// Crop rectangle `x,y,width,height`.
        #[arg(long)]
        crop: Rect,
    },
    /// Delete a sticker and its images.
    Delete { id: StickerId },
    /// Copy a rendered sticker to the clipboard.
    Insert { id: StickerId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("load configuration")?;

    // Commands that open a sticker decide what picking it means.
    match cli.cmd {
        Command::Edit { .. } | Command::Delete { .. } => {
            config.flow.sticker_pick = StickerPickPolicy::Edit
        }
        Command::Insert { .. } => config.flow.sticker_pick = StickerPickPolicy::Insert,
        Command::Add { .. } | Command::List => {}
    }

    let picked_file = match &cli.cmd {
        Command::Add { image, .. } => Some(image.clone()),
        _ => None,
    };

    let app = Application::open(config).context("open sticker storage")?;
    let host: Arc<dyn HostContext> = Arc::new(DesktopHost::new(PresentationStyle::Compact));
    let picker = Arc::new(FileImagePicker::new(picked_file));
    let mut session = Session::new(app, Some(host), picker)?;
    session.start().await;

    match cli.cmd {
        Command::Add { crop, .. } => cmd_add(&mut session, crop).await,
        Command::List => cmd_list(&session),
        Command::Edit { id, crop } => cmd_edit(&mut session, id, crop).await,
        Command::Delete { id } => cmd_delete(&mut session, id).await,
        Command::Insert { id } => cmd_insert(&mut session, id).await,
    }
}

async fn cmd_add(session: &mut Session, crop: Option<Rect>) -> anyhow::Result<()> {
    let index = session
        .add_sticker_index()
        .context("browser has no add entry")?;
    session.send_browser(StickerBrowserIntent::ItemSelected(index));
    session.settle().await;

    let Some(editor) = session.editor() else {
        bail!("editor did not open");
    };
    if editor.info().original_image_is_none() {
        bail!("could not read the image");
    }
    let id = editor.sticker_id();

    if let Some(crop) = crop {
        session.send_editor(EditStickerIntent::CropChanged(crop));
    }
    save(session).await?;
    println!("{}", id);
    Ok(())
}

fn cmd_list(session: &Session) -> anyhow::Result<()> {
    for sticker in session.browser_items().iter().filter_map(|item| item.sticker()) {
        let crop = sticker.crop_bounds;
        println!(
            "{}\trev {}\tcrop {},{},{},{}",
            sticker.id, sticker.revision, crop.x, crop.y, crop.width, crop.height
        );
    }
    Ok(())
}

async fn cmd_edit(session: &mut Session, id: StickerId, crop: Rect) -> anyhow::Result<()> {
    open_sticker(session, id).await?;
    session.send_editor(EditStickerIntent::CropChanged(crop));
    save(session).await
}

async fn cmd_delete(session: &mut Session, id: StickerId) -> anyhow::Result<()> {
    open_sticker(session, id).await?;
    session.send_editor(EditStickerIntent::DeleteTapped);
    let events = session.settle().await;
    if !events.contains(&SessionEvent::EditorDismissed(DismissReason::Deleted)) {
        bail!("sticker {} was not deleted", id);
    }
    Ok(())
}

async fn cmd_insert(session: &mut Session, id: StickerId) -> anyhow::Result<()> {
    select_sticker(session, id)?;
    for event in session.settle().await {
        match event {
            SessionEvent::StickerInserted(inserted) if inserted == id => {
                println!("Copied {} to the clipboard", id);
                return Ok(());
            }
            SessionEvent::InsertFailed { message, .. } => bail!(message),
            _ => {}
        }
    }
    bail!("sticker {} was not inserted", id)
}

fn select_sticker(session: &mut Session, id: StickerId) -> anyhow::Result<()> {
    let index = session
        .browser_index_of(id)
        .with_context(|| format!("no rendered sticker {}", id))?;
    session.send_browser(StickerBrowserIntent::ItemSelected(index));
    Ok(())
}

async fn open_sticker(session: &mut Session, id: StickerId) -> anyhow::Result<()> {
    select_sticker(session, id)?;
    session.settle().await;
    if session.editor().map(|editor| editor.sticker_id()) != Some(id) {
        bail!("editor did not open for sticker {}", id);
    }
    Ok(())
}

async fn save(session: &mut Session) -> anyhow::Result<()> {
    session.settle().await;
    if session.editor_save_enabled() != Some(true) {
        bail!("sticker needs an image and a non-empty crop to be saved");
    }
    session.send_editor(EditStickerIntent::SaveTapped);
    let events = session.settle().await;
    if !events.contains(&SessionEvent::EditorDismissed(DismissReason::Saved)) {
        bail!("sticker was not saved");
    }
    Ok(())
}
