use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stickerkit::{
    CanvasDocument, Catalog, Compositor, CompositorOpts, DirAssetProvider, DirExportSink,
    FrameRGBA, FsWorkStore, OutputFormat, SavePipeline, WallpaperCategory, WorkStore,
};

#[derive(Parser, Debug)]
#[command(name = "stickerkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Flatten a canvas document into an image.
    Render(RenderArgs),
    /// Write a bounded JPEG thumbnail of an image.
    Thumb(ThumbArgs),
    /// Flatten a canvas and store it in the works gallery and an export directory.
    Save(SaveArgs),
    /// Inspect or prune the works gallery.
    Works(WorksArgs),
    /// Print the preset wallpapers and sticker themes.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input canvas document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset root directory.
    #[arg(long)]
    assets: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Override the document's supersample factor.
    #[arg(long)]
    supersample: Option<f64>,

    /// Output encoding.
    #[arg(long, value_enum, default_value_t = FormatChoice::Jpeg)]
    format: FormatChoice,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = stickerkit::DEFAULT_JPEG_QUALITY)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct ThumbArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Longest edge in pixels.
    #[arg(long, default_value_t = stickerkit::DEFAULT_THUMBNAIL_MAX)]
    max: u32,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = stickerkit::DEFAULT_THUMBNAIL_QUALITY)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct SaveArgs {
    /// Input canvas document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Asset root directory.
    #[arg(long)]
    assets: PathBuf,

    /// Works gallery directory.
    #[arg(long)]
    works: PathBuf,

    /// Export directory.
    #[arg(long)]
    export: PathBuf,

    /// Override the document's supersample factor.
    #[arg(long)]
    supersample: Option<f64>,
}

#[derive(Parser, Debug)]
struct WorksArgs {
    /// Works gallery directory.
    #[arg(long)]
    works: PathBuf,

    #[command(subcommand)]
    action: WorksAction,
}

#[derive(Subcommand, Debug)]
enum WorksAction {
    /// List works, newest first, as JSON.
    List,
    /// Delete a work by id.
    Delete {
        /// Work id.
        id: uuid::Uuid,
    },
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Load the catalog from JSON instead of the built-in presets.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Only print themes.
    #[arg(long, conflicts_with = "wallpapers")]
    themes: bool,

    /// Only print wallpapers.
    #[arg(long)]
    wallpapers: bool,

    /// Wallpaper category filter.
    #[arg(long, default_value = "all")]
    category: WallpaperCategory,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Jpeg,
    Png,
}

impl From<FormatChoice> for OutputFormat {
    fn from(v: FormatChoice) -> Self {
        match v {
            FormatChoice::Jpeg => OutputFormat::Jpeg,
            FormatChoice::Png => OutputFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Thumb(args) => cmd_thumb(args),
        Command::Save(args) => cmd_save(args).await,
        Command::Works(args) => cmd_works(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn read_document(path: &Path, supersample: Option<f64>) -> anyhow::Result<CanvasDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read canvas document '{}'", path.display()))?;
    let mut doc = CanvasDocument::from_json_str(&text)?;
    if let Some(s) = supersample {
        doc.supersample = s;
    }
    doc.validate()?;
    Ok(doc)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path, args.supersample)?;
    let opts = CompositorOpts::default()
        .with_format(args.format.into())
        .with_jpeg_quality(args.quality);
    let compositor = Compositor::with_opts(Arc::new(DirAssetProvider::new(args.assets)), opts);

    let out = compositor.render(&doc.canvas, doc.viewport, doc.supersample)?;
    write_output(&args.out, &out.image_bytes)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        out.pixel_width,
        out.pixel_height
    );
    Ok(())
}

fn cmd_thumb(args: ThumbArgs) -> anyhow::Result<()> {
    let source = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let (width, height) = source.dimensions();
    let frame = FrameRGBA {
        width,
        height,
        data: source.into_raw(),
        premultiplied: false,
    };

    let bytes = stickerkit::thumbnail_jpeg(&frame, args.max, args.quality)?;
    write_output(&args.out, &bytes)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_save(args: SaveArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path, args.supersample)?;
    let compositor = Arc::new(Compositor::new(Arc::new(DirAssetProvider::new(args.assets))));
    let works = Arc::new(FsWorkStore::open(&args.works)?);
    let export = Arc::new(DirExportSink::new(&args.export));
    let pipeline = SavePipeline::new(compositor, works, export);

    let report = pipeline
        .save(doc.canvas, doc.viewport, doc.supersample)
        .await?;

    match &report.work {
        Ok(rec) => eprintln!("saved work {} ({})", rec.id, rec.file_name),
        Err(err) => eprintln!("work gallery: {err}"),
    }
    match &report.export {
        Ok(receipt) => eprintln!("exported {}", receipt.location),
        Err(err) => eprintln!("export: {err}"),
    }

    if !report.is_complete() {
        anyhow::bail!("save finished with errors");
    }
    Ok(())
}

fn cmd_works(args: WorksArgs) -> anyhow::Result<()> {
    let store = FsWorkStore::open(&args.works)?;
    match args.action {
        WorksAction::List => {
            let works = store.list()?;
            println!("{}", serde_json::to_string_pretty(&works)?);
        }
        WorksAction::Delete { id } => {
            store.delete(id)?;
            eprintln!("deleted {id}");
        }
    }
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = match &args.file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read catalog '{}'", path.display()))?;
            Catalog::from_json_str(&text)?
        }
        None => Catalog::builtin(),
    };

    if !args.themes {
        for w in catalog.wallpapers_in(args.category) {
            println!("wallpaper\t{}\t{}\t{}", w.id, w.image_name, w.title);
        }
    }
    if !args.wallpapers {
        for t in &catalog.themes {
            println!(
                "theme\t{}\t{} {}\t{} stickers",
                t.id,
                t.emoji,
                t.name,
                t.sticker_count()
            );
        }
    }
    Ok(())
}
