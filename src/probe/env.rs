//! Read-only views of the execution environment
//!
//! The probe only ever asks these three questions, so tests can answer them
//! from a fixed table instead of the real PATH and filesystem.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ProbeError;

/// Limits for a workspace file scan
#[derive(Debug, Clone)]
pub struct ScanLimits {
    pub max_depth: usize,
    pub max_files: usize,
    /// Directory names never descended into
    pub exclude: Vec<String>,
}

/// Files found by a bounded scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Paths relative to the workspace root
    pub files: Vec<PathBuf>,
    /// The scan stopped at `max_files`
    pub truncated: bool,
}

/// Environment queries used by the session probe
pub trait Environment {
    /// Resolve a tool on the executable search path
    fn resolve_tool(&self, name: &str) -> Result<PathBuf, ProbeError>;

    /// Whether a path relative to the workspace root exists
    fn marker_exists(&self, relative: &Path) -> Result<bool, ProbeError>;

    /// List workspace files within `limits`
    fn scan_files(&self, limits: &ScanLimits) -> Result<FileScan, ProbeError>;
}

/// The real PATH and filesystem, rooted at a workspace directory
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    root: PathBuf,
}

impl SystemEnvironment {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Environment for SystemEnvironment {
    fn resolve_tool(&self, name: &str) -> Result<PathBuf, ProbeError> {
        which::which(name).map_err(|_| ProbeError::NotFound(name.to_string()))
    }

    fn marker_exists(&self, relative: &Path) -> Result<bool, ProbeError> {
        let path = self.root.join(relative);
        path.try_exists()
            .map_err(|source| ProbeError::Io { path, source })
    }

    fn scan_files(&self, limits: &ScanLimits) -> Result<FileScan, ProbeError> {
        let exclude: HashSet<&str> = limits.exclude.iter().map(|s| s.as_str()).collect();
        let mut scan = FileScan::default();
        let mut stack = vec![(self.root.clone(), 0usize)];

        while let Some((dir, depth)) = stack.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                // An unreadable root is a failed check; unreadable subdirectories are skipped
                Err(source) if dir == self.root => {
                    return Err(ProbeError::Io { path: dir, source })
                }
                Err(_) => continue,
            };

            for entry in entries.flatten() {
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                let path = entry.path();

                if file_type.is_dir() {
                    let name = entry.file_name();
                    if depth < limits.max_depth && !exclude.contains(&*name.to_string_lossy()) {
                        stack.push((path, depth + 1));
                    }
                } else if file_type.is_file() {
                    if scan.files.len() >= limits.max_files {
                        scan.truncated = true;
                        return Ok(scan);
                    }
                    let relative = path.strip_prefix(&self.root).unwrap_or(&path).to_path_buf();
                    scan.files.push(relative);
                }
            }
        }

        Ok(scan)
    }
}

/// A fixed environment for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct FixedEnvironment {
    pub tools: BTreeSet<String>,
    pub markers: BTreeSet<PathBuf>,
    pub files: Vec<PathBuf>,
    /// Markers whose check fails as if permission were denied
    pub unreadable: BTreeSet<PathBuf>,
}

impl FixedEnvironment {
    pub fn with_tool(mut self, name: &str) -> Self {
        self.tools.insert(name.to_string());
        self
    }

    pub fn with_marker(mut self, path: &str) -> Self {
        self.markers.insert(PathBuf::from(path));
        self
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.push(PathBuf::from(path));
        self
    }

    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.unreadable.insert(PathBuf::from(path));
        self
    }
}

impl Environment for FixedEnvironment {
    fn resolve_tool(&self, name: &str) -> Result<PathBuf, ProbeError> {
        if self.tools.contains(name) {
            Ok(PathBuf::from("/usr/bin").join(name))
        } else {
            Err(ProbeError::NotFound(name.to_string()))
        }
    }

    fn marker_exists(&self, relative: &Path) -> Result<bool, ProbeError> {
        if self.unreadable.contains(relative) {
            return Err(ProbeError::Io {
                path: relative.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        Ok(self.markers.contains(relative))
    }

    fn scan_files(&self, limits: &ScanLimits) -> Result<FileScan, ProbeError> {
        let mut scan = FileScan::default();
        for file in &self.files {
            let excluded = file.components().any(|c| {
                limits
                    .exclude
                    .iter()
                    .any(|e| c.as_os_str() == std::ffi::OsStr::new(e))
            });
            if excluded || file.components().count() > limits.max_depth + 1 {
                continue;
            }
            if scan.files.len() >= limits.max_files {
                scan.truncated = true;
                break;
            }
            scan.files.push(file.clone());
        }
        Ok(scan)
    }
}
