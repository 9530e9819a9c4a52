use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tryon", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one frame over a still background and write it as a PNG.
    Snapshot(SnapshotArgs),
    /// Validate a catalog and list the accepted overlays.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Background image standing in for the camera feed.
    #[arg(long)]
    background: PathBuf,

    /// Catalog JSON. Overlay image paths resolve relative to its directory.
    #[arg(long)]
    catalog: PathBuf,

    /// Overlay id to place (repeatable, in compositing order).
    #[arg(long = "overlay")]
    overlays: Vec<String>,

    /// Landmark frame JSON (array of at least 468 points); enables face tracking.
    #[arg(long)]
    landmarks: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output width (defaults to the background width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height (defaults to the background height).
    #[arg(long)]
    height: Option<u32>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Catalog JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TRYON_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(p) => tryon::EngineConfig::from_path(p)?,
        None => tryon::EngineConfig::default(),
    };
    let catalog = tryon::Catalog::from_path(&args.catalog)?;
    let assets_root = args.catalog.parent().unwrap_or_else(|| Path::new("."));

    let bytes = std::fs::read(&args.background)
        .with_context(|| format!("read background '{}'", args.background.display()))?;
    let background = tryon::decode_image(&bytes)?;
    let width = args.width.unwrap_or(background.width);
    let height = args.height.unwrap_or(background.height);

    let mut studio = tryon::TryOnStudio::new(
        config,
        catalog,
        Box::new(tryon::StillImageCamera::from_image(&background)),
        Box::new(tryon::ManualScheduler::new()),
    )?
    .with_fetcher(Box::new(tryon::FsFetcher::new(assets_root)));
    studio.resize(
        tryon::Point::ORIGIN,
        tryon::Size::new(f64::from(width), f64::from(height)),
        1.0,
    );
    studio.start_camera()?;

    if let Some(path) = &args.landmarks {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open landmarks '{}'", path.display()))?;
        let detector = tryon::StaticDetector::from_reader(std::io::BufReader::new(file))?;
        studio.enable_face_tracking(|| Ok(Box::new(detector)))?;
    }

    for id in &args.overlays {
        let id = tryon::OverlayId::new(id.as_str());
        if studio.catalog().get(&id).is_none() {
            tracing::warn!(%id, "overlay not in catalog, drawing placeholder");
        }
        studio.add_layer(id);
    }

    studio.render_frame(0.0)?;
    let png = studio
        .capture_snapshot()?
        .context("no frame was composited")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = tryon::Catalog::from_path(&args.in_path)?;
    for def in catalog.iter() {
        println!("{}", serde_json::to_string(def)?);
    }
    eprintln!(
        "{} overlays accepted, {} records dropped",
        catalog.len(),
        catalog.dropped()
    );
    Ok(())
}
