use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use lightbox::{
    AssetAddress, CropRect, DEFAULT_SLOTS, Scheduler, ServeOutcome, ServiceOpts, Settings,
    ThumbCache, ThumbnailService, ThumbnailSpec,
};

#[derive(Parser, Debug)]
#[command(name = "lightbox", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one thumbnail and write the bytes to a file.
    Thumb(ThumbArgs),
    /// Pre-generate thumbnails for every file in a directory.
    Warm(WarmArgs),
}

#[derive(Parser, Debug)]
struct ThumbArgs {
    /// Source image path.
    #[arg(long)]
    source: PathBuf,

    /// Thumbnail cache directory.
    #[arg(long)]
    cache_dir: PathBuf,

    /// Target width in pixels (defaults to the settings value).
    #[arg(long)]
    size: Option<u32>,

    /// Crop rectangle as `x,y,w,h` in source pixels.
    #[arg(long)]
    crop: Option<String>,

    /// Settings JSON supplying the default width.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output path for the encoded thumbnail.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct WarmArgs {
    /// Directory of source images.
    #[arg(long)]
    dir: PathBuf,

    /// Thumbnail cache directory.
    #[arg(long)]
    cache_dir: PathBuf,

    /// Target width in pixels (defaults to the settings value).
    #[arg(long)]
    size: Option<u32>,

    /// Concurrent generation slots.
    #[arg(long, default_value_t = DEFAULT_SLOTS)]
    slots: usize,

    /// Settings JSON supplying the default width.
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Thumb(args) => cmd_thumb(args),
        Command::Warm(args) => cmd_warm(args),
    }
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<Settings> {
    Ok(match path {
        Some(p) => Settings::from_path(p)?,
        None => Settings::default(),
    })
}

fn cmd_thumb(args: ThumbArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_ref())?;
    let cache = ThumbCache::open(&args.cache_dir)?;
    let service = ThumbnailService::new(
        cache,
        ServiceOpts {
            default_width: settings.thumb_width,
            ..ServiceOpts::default()
        },
    );

    let crop = args.crop.as_deref().map(CropRect::parse).transpose()?;
    let addr = AssetAddress::Thumbnail(ThumbnailSpec {
        source: args.source,
        width: args.size,
        crop,
    });

    match service.serve(&addr) {
        ServeOutcome::Ready(bytes) => {
            if let Some(parent) = args.out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(&args.out, &bytes)
                .with_context(|| format!("write thumbnail '{}'", args.out.display()))?;
            service.cache().flush();
            eprintln!("wrote {} ({} bytes)", args.out.display(), bytes.len());
            Ok(())
        }
        outcome => anyhow::bail!("could not serve '{addr}': status {}", outcome.status()),
    }
}

fn cmd_warm(args: WarmArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_ref())?;
    let cache = ThumbCache::open(&args.cache_dir)?;
    let service = ThumbnailService::new(
        cache,
        ServiceOpts {
            default_width: settings.thumb_width,
            ..ServiceOpts::default()
        },
    );
    let sched = Scheduler::new(args.slots);
    let size = args.size;

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(&args.dir)
        .with_context(|| format!("read dir '{}'", args.dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    let (done_tx, done_rx) = mpsc::channel::<(PathBuf, u16)>();
    std::thread::scope(|scope| {
        for source in &sources {
            let (id, ticket) = sched.request_load(&source.display().to_string(), 0);
            let service = &service;
            let sched = &sched;
            let done_tx = done_tx.clone();
            scope.spawn(move || {
                if !ticket.wait() {
                    return;
                }
                let addr = AssetAddress::Thumbnail(ThumbnailSpec {
                    source: source.clone(),
                    width: size,
                    crop: None,
                });
                let outcome = service.serve(&addr);
                sched.notify_finished(id);
                let _ = done_tx.send((source.clone(), outcome.status()));
            });
        }
        drop(done_tx);
        while let Ok((path, status)) = done_rx.recv() {
            eprintln!("{status} {}", path.display());
        }
    });

    service.cache().flush();
    eprintln!(
        "warmed {} files into {}",
        sources.len(),
        args.cache_dir.display()
    );
    Ok(())
}
