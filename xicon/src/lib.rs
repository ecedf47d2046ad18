use anyhow::{Context, Result};
use image::RgbaImage;
use scaler::Scaler;
use std::path::{Path, PathBuf};

mod config;
pub mod mipmap;

pub use crate::config::{Config, IconArgs, RawConfig, DEFAULT_CONFIG};
pub use crate::mipmap::{plan, IconKind, SizeTable, Target};

/// Result of a generator run. Failures are reported through `tracing` and
/// handed back here, they never abort the process.
#[derive(Debug)]
pub enum Outcome {
    /// Every written file, in write order.
    Generated(Vec<PathBuf>),
    MissingSource(PathBuf),
    Failed(anyhow::Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Runs the command line: builds the config, then either prints the plan
/// or generates. Generator failures only become an error with `--strict`.
pub fn run(args: &IconArgs) -> Result<()> {
    let config = Config::from_args(args)?;
    if args.dry_run {
        for target in plan(&config.dest, &config.sizes) {
            println!("{:>4}x{:<4} {}", target.size, target.size, target.path.display());
        }
        return Ok(());
    }
    let outcome = generate(&config);
    if args.strict && !outcome.is_success() {
        anyhow::bail!("icon generation failed");
    }
    Ok(())
}

pub fn generate(config: &Config) -> Outcome {
    let _span = tracing::debug_span!("generate", source = %config.source.display()).entered();
    if !config.source.is_file() {
        tracing::error!("source file not found: {}", config.source.display());
        return Outcome::MissingSource(config.source.clone());
    }
    match try_generate(config) {
        Ok(written) => Outcome::Generated(written),
        Err(err) => {
            tracing::error!("error processing image: {:#}", err);
            Outcome::Failed(err)
        }
    }
}

fn try_generate(config: &Config) -> Result<Vec<PathBuf>> {
    config.sizes.validate()?;
    let scaler = Scaler::open(&config.source)?;
    let (width, height) = scaler.dimensions();
    tracing::debug!("decoded {} ({}x{})", config.source.display(), width, height);
    let mut written = Vec::with_capacity(config.sizes.len() * 2 + 1);
    for (folder, size) in config.sizes.iter() {
        create_dir(&config.dest.join(folder))?;
        let mut icon = scaler.resize(size);
        let launcher = mipmap::icon_path(&config.dest, folder, IconKind::Launcher);
        save(&icon, launcher, &mut written)?;
        if config.round_mask {
            scaler::mask_circle(&mut icon);
        }
        let round = mipmap::icon_path(&config.dest, folder, IconKind::Round);
        save(&icon, round, &mut written)?;
    }
    create_dir(&config.dest.join(mipmap::FOREGROUND_DIR))?;
    let foreground = scaler.resize(mipmap::FOREGROUND_SIZE);
    save(&foreground, mipmap::foreground_path(&config.dest), &mut written)?;
    Ok(written)
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))
}

fn save(icon: &RgbaImage, path: PathBuf, written: &mut Vec<PathBuf>) -> Result<()> {
    scaler::save_webp(icon, &path)?;
    tracing::info!("saved {}", path.display());
    written.push(path);
    Ok(())
}
