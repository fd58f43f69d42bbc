//! Session-start context probe
//!
//! Runs independent read-only checks (tools on PATH, workspace markers,
//! language composition) and renders them as advisory text for the agent.
//! A failing check degrades to Missing/Unknown; it never aborts the others.

pub mod env;

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::SessionConfig;
use env::{Environment, ScanLimits};

/// Result of one tool-presence check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Installed,
    Missing,
}

/// Result of one marker check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Present,
    Absent,
    /// The check itself failed
    Unknown,
}

/// Everything one probe run observed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextProbeResult {
    pub tool_availability: BTreeMap<String, Availability>,
    pub repository_markers: BTreeMap<String, MarkerState>,
    pub language_counts: BTreeMap<String, usize>,
    /// The language scan hit its file limit
    pub languages_truncated: bool,
}

/// The probe, configured once per process
#[derive(Debug, Clone)]
pub struct ContextProbe {
    config: SessionConfig,
}

impl ContextProbe {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Run every check against `env`
    pub fn inspect(&self, env: &dyn Environment) -> ContextProbeResult {
        let mut result = ContextProbeResult::default();

        for tool in &self.config.tools {
            let availability = match env.resolve_tool(&tool.name) {
                Ok(_) => Availability::Installed,
                Err(_) => Availability::Missing,
            };
            result.tool_availability.insert(tool.name.clone(), availability);
        }

        for marker in &self.config.markers {
            let state = match env.marker_exists(Path::new(&marker.path)) {
                Ok(true) => MarkerState::Present,
                Ok(false) => MarkerState::Absent,
                Err(e) => {
                    eprintln!("Warning: marker check for {} failed: {}", marker.name, e);
                    MarkerState::Unknown
                }
            };
            result.repository_markers.insert(marker.name.clone(), state);
        }

        if self.config.languages.enabled {
            let languages = &self.config.languages;
            let limits = ScanLimits {
                max_depth: languages.max_depth,
                max_files: languages.max_files,
                exclude: languages.exclude.clone(),
            };
            match env.scan_files(&limits) {
                Ok(scan) => {
                    for file in &scan.files {
                        let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
                            continue;
                        };
                        if let Some(category) = languages.extensions.get(&ext.to_lowercase()) {
                            *result.language_counts.entry(category.clone()).or_insert(0) += 1;
                        }
                    }
                    result.languages_truncated = scan.truncated;
                }
                Err(e) => eprintln!("Warning: language scan failed: {}", e),
            }
        }

        result
    }

    /// Render a result as advisory text, one line per check
    pub fn render(&self, result: &ContextProbeResult) -> String {
        let mut lines = Vec::new();

        if let Some(preamble) = self.config.preamble.as_deref() {
            if !preamble.trim().is_empty() {
                lines.push(preamble.trim_end().to_string());
            }
        }

        for tool in &self.config.tools {
            let line = match result.tool_availability.get(&tool.name) {
                Some(Availability::Installed) => format!("- {}: installed", tool.name),
                _ => match &tool.install {
                    Some(install) => format!("- {}: missing (install: `{}`)", tool.name, install),
                    None => format!("- {}: missing", tool.name),
                },
            };
            lines.push(line);
        }

        for marker in &self.config.markers {
            let line = match result.repository_markers.get(&marker.name) {
                Some(MarkerState::Present) => {
                    format!("- {} ({}): initialized", marker.name, marker.path)
                }
                Some(MarkerState::Unknown) => {
                    format!("- {} ({}): unknown (check failed)", marker.name, marker.path)
                }
                _ => match &marker.init {
                    Some(init) => format!(
                        "- {} ({}): not initialized (run `{}`)",
                        marker.name, marker.path, init
                    ),
                    None => format!("- {} ({}): not initialized", marker.name, marker.path),
                },
            };
            lines.push(line);
        }

        if !result.language_counts.is_empty() {
            let mut counts: Vec<(&String, &usize)> = result.language_counts.iter().collect();
            // Highest count first, then by name
            counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            let summary: Vec<String> = counts
                .iter()
                .map(|(lang, count)| format!("{} {}", lang, count))
                .collect();
            let suffix = if result.languages_truncated {
                " (scan limit reached)"
            } else {
                ""
            };
            lines.push(format!("- languages: {}{}", summary.join(", "), suffix));
        }

        lines.join("\n")
    }

    /// Inspect and render in one step
    pub fn advisory(&self, env: &dyn Environment) -> String {
        self.render(&self.inspect(env))
    }
}
