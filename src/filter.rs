//! File filtering: size, age, extension and file name globs.
//!
//! Rules come from two places: the per-target [`TargetRules`] and an optional
//! global [`ScanFilter`] overlay. Both are compiled into a [`FileFilter`] once
//! per target so the per-file check is a pure predicate with no allocation
//! beyond the file name lookup.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;

/// Per-target matching rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRules {
    /// File name globs; empty means "match every file"
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub min_size: u64,
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub min_age_days: Option<u32>,
}

/// Global overlay applied on top of every target's own rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFilter {
    #[serde(default)]
    pub min_size: u64,
    #[serde(default)]
    pub max_size: Option<u64>,
    #[serde(default)]
    pub min_age_days: Option<u32>,
    /// Only files with one of these extensions pass (empty = any)
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude_extensions: Vec<String>,
}

impl ScanFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, min_size: u64, max_size: Option<u64>) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_min_age(mut self, days: u32) -> Self {
        self.min_age_days = Some(days);
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions.into_iter().map(|e| normalize_extension(e.as_ref())).collect();
        self
    }

    pub fn with_exclude_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_extensions =
            extensions.into_iter().map(|e| normalize_extension(e.as_ref())).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ScanFilter::default()
    }
}

/// Lower-case an extension and make sure it has a leading dot: `"TMP"` -> `".tmp"`
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Extension of `path` as `".ext"` in lower case, or `None` when it has none
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}

/// Compiled, immutable filter for one scan target
#[derive(Debug, Clone)]
pub struct FileFilter {
    min_size: u64,
    max_size: Option<u64>,
    min_age_days: Option<u32>,
    global_min_size: u64,
    global_max_size: Option<u64>,
    global_min_age_days: Option<u32>,
    extensions: Vec<String>,
    exclude_extensions: Vec<String>,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileFilter {
    pub fn new(rules: &TargetRules, global: Option<&ScanFilter>) -> Result<Self> {
        let global = global.cloned().unwrap_or_default();
        Ok(Self {
            min_size: rules.min_size,
            max_size: rules.max_size,
            min_age_days: rules.min_age_days,
            global_min_size: global.min_size,
            global_max_size: global.max_size,
            global_min_age_days: global.min_age_days,
            extensions: global.extensions.iter().map(|e| normalize_extension(e)).collect(),
            exclude_extensions: global
                .exclude_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            include: compile_globs(&rules.patterns)?,
            exclude: compile_globs(&rules.exclude_patterns)?,
        })
    }

    /// Does a file with this size and modification time pass every rule?
    pub fn matches(&self, path: &Path, size: u64, modified: SystemTime) -> bool {
        self.matches_at(path, size, modified, Utc::now())
    }

    /// [`FileFilter::matches`] evaluated against a fixed "now"
    pub fn matches_at(
        &self,
        path: &Path,
        size: u64,
        modified: SystemTime,
        now: DateTime<Utc>,
    ) -> bool {
        // Cheap numeric checks first
        if !within_size(size, self.min_size, self.max_size)
            || !within_size(size, self.global_min_size, self.global_max_size)
        {
            return false;
        }

        let modified: DateTime<Utc> = modified.into();
        let age_days = now.signed_duration_since(modified).num_days();
        if !old_enough(age_days, self.min_age_days)
            || !old_enough(age_days, self.global_min_age_days)
        {
            return false;
        }

        if !self.extensions.is_empty() || !self.exclude_extensions.is_empty() {
            let ext = dotted_extension(path).unwrap_or_default();
            if !self.extensions.is_empty() && !self.extensions.contains(&ext) {
                return false;
            }
            if self.exclude_extensions.contains(&ext) {
                return false;
            }
        }

        self.name_matches(path)
    }

    /// Glob check on the file name alone
    pub fn name_matches(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy(),
            None => return false,
        };

        if let Some(exclude) = &self.exclude {
            if exclude.is_match(name.as_ref()) {
                return false;
            }
        }

        match &self.include {
            Some(include) => include.is_match(name.as_ref()),
            None => true,
        }
    }
}

/// One-shot form of the filter contract. Compiles the rules on every call;
/// walkers should build a [`FileFilter`] once instead.
pub fn matches(
    path: &Path,
    size: u64,
    modified: SystemTime,
    rules: &TargetRules,
    global: Option<&ScanFilter>,
) -> Result<bool> {
    Ok(FileFilter::new(rules, global)?.matches(path, size, modified))
}

fn within_size(size: u64, min: u64, max: Option<u64>) -> bool {
    size >= min && max.map_or(true, |max| size <= max)
}

fn old_enough(age_days: i64, min_age_days: Option<u32>) -> bool {
    match min_age_days {
        Some(min) if min > 0 => age_days >= i64::from(min),
        _ => true,
    }
}

fn compile_globs(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(&translate_glob(pattern))
            .case_insensitive(true)
            .literal_separator(false)
            .backslash_escape(true)
            .build()
            .with_context(|| format!("Invalid file pattern: {}", pattern))?;
        builder.add(glob);
    }
    Ok(Some(builder.build().context("Failed to compile file patterns")?))
}

/// Restrict glob syntax to `*` and `?`; every other character is literal.
fn translate_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut prev_star = false;
    for c in pattern.chars() {
        match c {
            '*' => {
                // `**` means the same as `*` inside a file name
                if !prev_star {
                    out.push('*');
                }
            }
            '?' => out.push('?'),
            '[' | ']' | '{' | '}' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
        prev_star = c == '*';
    }
    out
}
