use anyhow::Result;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DPI_LABEL: [&str; 5] = ["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"];

pub const DPI_SIZE: [u32; 5] = [48, 72, 96, 144, 192];

/// Adaptive icon foreground, 108dp at xxxhdpi including the full-bleed area.
pub const FOREGROUND_SIZE: u32 = 432;

/// Largest size a table entry may ask for.
pub const MAX_SIZE: u32 = 4096;

pub const FOREGROUND_DIR: &str = "drawable";

pub const EXTENSION: &str = "webp";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IconKind {
    Launcher,
    /// Currently the launcher bitmap again unless circular masking is enabled.
    Round,
    Foreground,
}

impl IconKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Launcher => "ic_launcher",
            Self::Round => "ic_launcher_round",
            Self::Foreground => "ic_launcher_foreground",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.{}", self.name(), EXTENSION)
    }
}

/// Ordered mapping of resource folder to square icon size in px.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SizeTable {
    entries: Vec<(String, u32)>,
}

impl Default for SizeTable {
    fn default() -> Self {
        DPI_LABEL
            .iter()
            .zip(DPI_SIZE)
            .map(|(label, size)| (format!("mipmap-{}", label), size))
            .collect()
    }
}

impl SizeTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a folder, replacing the size of an existing one in place.
    pub fn insert(&mut self, folder: impl Into<String>, size: u32) {
        let folder = folder.into();
        match self.entries.iter_mut().find(|(f, _)| *f == folder) {
            Some(entry) => entry.1 = size,
            None => self.entries.push((folder, size)),
        }
    }

    /// Rejects sizes outside `1..=MAX_SIZE`.
    pub fn validate(&self) -> Result<()> {
        for (folder, size) in self.iter() {
            anyhow::ensure!(size > 0, "size of {} must be at least 1px", folder);
            anyhow::ensure!(
                size <= MAX_SIZE,
                "size of {} must be at most {}px, got {}px",
                folder,
                MAX_SIZE,
                size
            );
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(f, size)| (f.as_str(), *size))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for SizeTable {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (folder, size) in iter {
            table.insert(folder, size);
        }
        table
    }
}

impl<'de> Deserialize<'de> for SizeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SizeTableVisitor;

        impl<'de> Visitor<'de> for SizeTableVisitor {
            type Value = SizeTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of folder names to icon sizes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SizeTable, A::Error> {
                let mut table = SizeTable::new();
                while let Some((folder, size)) = map.next_entry::<String, u32>()? {
                    table.insert(folder, size);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(SizeTableVisitor)
    }
}

pub fn icon_path(dest: &Path, folder: &str, kind: IconKind) -> PathBuf {
    dest.join(folder).join(kind.file_name())
}

pub fn foreground_path(dest: &Path) -> PathBuf {
    icon_path(dest, FOREGROUND_DIR, IconKind::Foreground)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    pub kind: IconKind,
    pub size: u32,
    pub path: PathBuf,
}

/// Lists every file a run writes, in write order.
pub fn plan(dest: &Path, sizes: &SizeTable) -> Vec<Target> {
    let mut targets = Vec::with_capacity(sizes.len() * 2 + 1);
    for (folder, size) in sizes.iter() {
        for kind in [IconKind::Launcher, IconKind::Round] {
            targets.push(Target {
                kind,
                size,
                path: icon_path(dest, folder, kind),
            });
        }
    }
    targets.push(Target {
        kind: IconKind::Foreground,
        size: FOREGROUND_SIZE,
        path: foreground_path(dest),
    });
    targets
}
