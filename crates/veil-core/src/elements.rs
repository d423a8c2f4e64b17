//! Element asset library: three disjoint pools of small PNG overlays.
//!
//! Each pool is a flat directory of PNG files. A missing or empty directory
//! disables that category with a warning rather than failing the batch, and
//! the emoji/decorative pools are only scanned when the caller enables them.
//! Pools hold paths, not decoded buffers: every insertion decodes a fresh
//! working copy so the shared asset is never mutated.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{Config, ElementsConfig};

/// The three disjoint element categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCategory {
    Anomaly,
    Emoji,
    Decorative,
}

impl ElementCategory {
    /// Human-readable label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            ElementCategory::Anomaly => "anomaly",
            ElementCategory::Emoji => "emoji",
            ElementCategory::Decorative => "decorative",
        }
    }
}

/// Caller-supplied switches for the optional categories.
///
/// Anomaly insertion is always attempted when assets exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryToggles {
    /// Enable emoji insertion
    pub emoji: bool,
    /// Enable decorative-image insertion
    pub decorative: bool,
}

/// One category's candidate asset paths.
#[derive(Debug, Clone, Default)]
pub struct ElementPool {
    paths: Vec<PathBuf>,
}

impl ElementPool {
    /// Scan a directory for PNG assets.
    ///
    /// A missing directory yields an empty (disabled) pool with a warning.
    pub fn scan(category: ElementCategory, dir: &Path) -> Self {
        if !dir.is_dir() {
            tracing::warn!(
                "Element directory {:?} does not exist; {} insertion disabled",
                dir,
                category.label()
            );
            return Self::default();
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("png"))
                    .unwrap_or(false)
            })
            .collect();

        // Sort for deterministic pool indexing
        paths.sort();

        if paths.is_empty() {
            tracing::warn!(
                "No PNG {} elements found in {:?}; {} insertion will be skipped",
                category.label(),
                dir,
                category.label()
            );
        }

        Self { paths }
    }

    /// Number of assets in the pool.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the pool has no usable assets.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The candidate asset paths, sorted.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// All three pools plus their insertion settings.
#[derive(Debug, Clone)]
pub struct ElementLibrary {
    pub anomaly: ElementPool,
    pub emoji: ElementPool,
    pub decorative: ElementPool,
}

impl ElementLibrary {
    /// Scan the configured asset directories.
    ///
    /// Disabled categories are left empty without touching the filesystem,
    /// mirroring how the pools are consulted during processing.
    pub fn scan(config: &ElementsConfig, toggles: &CategoryToggles) -> Self {
        let anomaly = ElementPool::scan(
            ElementCategory::Anomaly,
            &Config::resolve_dir(&config.anomaly_dir),
        );
        let emoji = if toggles.emoji {
            ElementPool::scan(ElementCategory::Emoji, &Config::resolve_dir(&config.emoji_dir))
        } else {
            ElementPool::default()
        };
        let decorative = if toggles.decorative {
            ElementPool::scan(
                ElementCategory::Decorative,
                &Config::resolve_dir(&config.decorative_dir),
            )
        } else {
            ElementPool::default()
        };

        Self {
            anomaly,
            emoji,
            decorative,
        }
    }

    /// The pool for a category.
    pub fn pool(&self, category: ElementCategory) -> &ElementPool {
        match category {
            ElementCategory::Anomaly => &self.anomaly,
            ElementCategory::Emoji => &self.emoji,
            ElementCategory::Decorative => &self.decorative,
        }
    }
}
