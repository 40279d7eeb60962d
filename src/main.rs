//! Ainur CLI - load an asset manifest and report what ended up registered

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use ainur::consts::DEFAULT_SETTINGS_FILE;
use ainur::{AssetManifest, Engine, Settings};

/// Ainur - image and tile catalogs for 2D games
#[derive(Parser, Debug)]
#[command(name = "ainur")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Asset manifest (JSON)
    manifest: PathBuf,

    /// Settings file (default: ainur.json if present)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Print the catalogs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default(Path::new(DEFAULT_SETTINGS_FILE)),
    };

    let manifest = AssetManifest::load(&args.manifest)?;
    if manifest.is_empty() {
        log::warn!("Manifest {} lists no assets", args.manifest.display());
    }

    let mut engine = Engine::with_disk_source(settings)?;
    let base_dir = args.manifest.parent().unwrap_or(Path::new("."));
    let report = engine.apply_manifest(&manifest, base_dir)?;

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &engine.summary()?)?;
        writeln!(out)?;
    } else {
        writeln!(out, "images:")?;
        engine.images()?.dump(&mut out)?;
        writeln!(out, "tiles:")?;
        engine.tiles()?.dump(&mut out)?;
        writeln!(
            out,
            "{} images, {} tiles, {} failed",
            report.images, report.tiles, report.failed
        )?;
    }
    drop(out);

    engine.teardown()?;
    Ok(())
}
