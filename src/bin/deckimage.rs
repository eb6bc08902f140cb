use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use deckimage::theme::builtin::{self, SvgRasterizer};

#[derive(Parser, Debug)]
#[command(name = "deckimage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a deck record into a PNG.
    Render(RenderArgs),
    /// Print per-fleet statistics as JSON.
    Stats(StatsArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Master data JSON (START2.json).
    #[arg(long)]
    master: Option<PathBuf>,

    /// Directory of per-ship detail files (`<id>.json`).
    #[arg(long)]
    ships: Option<PathBuf>,

    /// Base URL serving START2.json and ship/<id>.json, used when --master is absent.
    #[cfg(feature = "fetch")]
    #[arg(long)]
    reference_url: Option<String>,

    /// Directory for cached reference documents.
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input deck-builder JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    source: SourceArgs,

    /// Override the record's theme tag (dark, 74lc, 74mc, 74sb).
    #[arg(long)]
    theme: Option<String>,

    /// Override the record's label language (jp, en, kr, scn).
    #[arg(long)]
    lang: Option<String>,

    /// Worker threads for fleet rendering.
    #[arg(long)]
    threads: Option<usize>,

    /// Render fleets one after another on the calling thread.
    #[arg(long)]
    serial: bool,

    /// Skip loading system fonts. Text is omitted from the output.
    #[arg(long)]
    no_fonts: bool,

    /// Print the number of font faces available to renderers.
    #[arg(long)]
    dump_fonts: bool,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Input deck-builder JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn make_source(args: &SourceArgs) -> anyhow::Result<Box<dyn deckimage::ReferenceSource>> {
    if let Some(master) = &args.master {
        let mut source = deckimage::DirSource::new(master);
        if let Some(ships) = &args.ships {
            source = source.with_ship_dir(ships);
        }
        return Ok(Box::new(source));
    }

    #[cfg(feature = "fetch")]
    if let Some(url) = &args.reference_url {
        let source = deckimage::HttpSource::new(deckimage::ReferenceLocation::from_base(url))?;
        return Ok(Box::new(source));
    }

    anyhow::bail!("no reference data: pass --master <START2.json>")
}

fn read_deck(path: &Path) -> anyhow::Result<deckimage::DeckBuilder> {
    deckimage::DeckBuilder::from_path(path)
        .with_context(|| format!("load deck '{}'", path.display()))
}

fn generator_config(
    source: &SourceArgs,
    threads: Option<usize>,
    serial: bool,
) -> deckimage::GeneratorConfig {
    deckimage::GeneratorConfig {
        cache_dir: source.cache_dir.clone(),
        parallel: !serial,
        threads,
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut deck = read_deck(&args.in_path)?;
    if let Some(theme) = args.theme {
        deck.theme = Some(theme);
    }
    if let Some(lang) = &args.lang {
        deck.lang = lang.parse()?;
    }

    let raster = if args.no_fonts {
        SvgRasterizer::without_fonts()
    } else {
        SvgRasterizer::with_system_fonts()
    };
    if args.dump_fonts {
        eprintln!("font_faces: {}", raster.font_faces());
    }

    let generator = deckimage::Generator::new(
        make_source(&args.source)?,
        builtin::registry(raster),
        generator_config(&args.source, args.threads, args.serial),
    )?;
    let image = generator.generate(&deck)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        image.width(),
        image.height()
    );
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let deck = read_deck(&args.in_path)?;
    let generator = deckimage::Generator::new(
        make_source(&args.source)?,
        deckimage::ThemeRegistry::empty(),
        generator_config(&args.source, None, true),
    )?;
    let stats = generator.fleet_stats(&deck)?;
    let json = serde_json::to_string_pretty(&stats).context("serialize fleet statistics")?;
    println!("{json}");
    Ok(())
}
