use crate::mipmap::SizeTable;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "xicon.yaml";

#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct IconArgs {
    /// Config file, defaults to `xicon.yaml` when present
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Source image
    #[clap(short, long)]
    pub source: Option<PathBuf>,
    /// Android `res` directory to write to
    #[clap(short, long)]
    pub dest: Option<PathBuf>,
    /// Replaces the size table, e.g. `--size mipmap-mdpi=48`
    #[clap(long = "size", value_name = "FOLDER=PX", value_parser = parse_size)]
    pub sizes: Vec<(String, u32)>,
    /// Clip `ic_launcher_round` to a circle instead of copying `ic_launcher`
    #[clap(long)]
    pub round_mask: bool,
    /// Print the files that would be written
    #[clap(long)]
    pub dry_run: bool,
    /// Exit with an error status when generation fails
    #[clap(long)]
    pub strict: bool,
}

fn parse_size(arg: &str) -> Result<(String, u32), String> {
    let (folder, size) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FOLDER=PX, got `{}`", arg))?;
    if folder.is_empty() {
        return Err(format!("missing folder in `{}`", arg));
    }
    let size = size
        .parse()
        .map_err(|err| format!("invalid size in `{}`: {}", arg, err))?;
    Ok((folder.to_string(), size))
}

#[derive(Clone, Debug)]
pub struct Config {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub sizes: SizeTable,
    pub round_mask: bool,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            sizes: Default::default(),
            round_mask: false,
        }
    }

    pub fn from_args(args: &IconArgs) -> Result<Self> {
        let mut raw = match &args.config {
            Some(path) => {
                anyhow::ensure!(path.exists(), "config file {} not found", path.display());
                RawConfig::parse(path)?
            }
            None => RawConfig::parse(DEFAULT_CONFIG)?,
        };
        raw.apply_args(args);
        raw.build()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub sizes: Option<SizeTable>,
    pub round_mask: Option<bool>,
}

impl RawConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Default::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn apply_args(&mut self, args: &IconArgs) {
        if let Some(source) = &args.source {
            self.source = Some(source.clone());
        }
        if let Some(dest) = &args.dest {
            self.dest = Some(dest.clone());
        }
        if !args.sizes.is_empty() {
            self.sizes = Some(args.sizes.iter().cloned().collect());
        }
        if args.round_mask {
            self.round_mask = Some(true);
        }
    }

    pub fn build(self) -> Result<Config> {
        let source = self
            .source
            .context("no source image given, use --source or `source:` in the config")?;
        let dest = self
            .dest
            .context("no destination given, use --dest or `dest:` in the config")?;
        let sizes = self.sizes.unwrap_or_default();
        sizes.validate()?;
        Ok(Config {
            source,
            dest,
            sizes,
            round_mask: self.round_mask.unwrap_or_default(),
        })
    }
}
