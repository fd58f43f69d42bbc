//! Configuration loading for hook-guard
//!
//! Supports TOML configuration with embedded defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::rules::custom::RuleConfig;

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Master switch; when false every event gets no opinion
    pub enabled: bool,

    /// Write one JSON line per decision to stderr
    pub audit_log: bool,

    /// Downgrade denials to advisory context
    pub warn_only: bool,

    /// Tool names whose input carries a shell command
    pub shell_tools: Vec<String>,

    /// Tool names whose input carries a search query
    pub search_tools: Vec<String>,

    /// Upper bound on the stdin payload
    pub max_input_bytes: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            audit_log: false,
            warn_only: false,
            shell_tools: vec!["Bash".to_string()],
            search_tools: vec!["WebSearch".to_string()],
            max_input_bytes: 1024 * 1024,
        }
    }
}

/// Version-control rule configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    /// Enable the built-in VCS rule table
    pub enabled: bool,

    /// Executable name the built-in rules inspect
    pub program: String,

    /// Flags that consume the following token as their value
    pub value_flags: Vec<String>,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "jj".to_string(),
            value_flags: [
                "-r",
                "--revision",
                "--revisions",
                "-m",
                "--message",
                "-R",
                "--repository",
                "--at-op",
                "--at-operation",
                "--color",
                "--config",
                "--config-file",
                "-d",
                "--destination",
                "-o",
                "--onto",
                "-A",
                "--insert-after",
                "-B",
                "--insert-before",
                "--from",
                "--into",
                "--to",
                "--tool",
                "--author",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Search-query recency guard configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Enable the stale-year check
    pub enabled: bool,

    /// Words that mark a query as intentionally about the past
    pub opt_out_keywords: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            opt_out_keywords: vec!["historical".to_string()],
        }
    }
}

/// An external tool the session probe looks for on PATH
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ToolProbeConfig {
    pub name: String,

    /// Command suggested when the tool is missing
    #[serde(default)]
    pub install: Option<String>,
}

/// A workspace marker the session probe looks for
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MarkerProbeConfig {
    /// Human-readable subsystem name
    pub name: String,

    /// Path relative to the workspace root
    pub path: String,

    /// Command suggested when the marker is absent
    #[serde(default)]
    pub init: Option<String>,
}

/// Language composition scan settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub enabled: bool,
    pub max_depth: usize,
    pub max_files: usize,

    /// Directory names never descended into
    pub exclude: Vec<String>,

    /// File extension (without dot) to category name
    pub extensions: BTreeMap<String, String>,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        let extensions = [
            ("rs", "Rust"),
            ("py", "Python"),
            ("ts", "TypeScript"),
            ("tsx", "TypeScript"),
            ("js", "JavaScript"),
            ("jsx", "JavaScript"),
            ("go", "Go"),
            ("java", "Java"),
            ("kt", "Kotlin"),
            ("rb", "Ruby"),
            ("c", "C"),
            ("h", "C"),
            ("cpp", "C++"),
            ("hpp", "C++"),
            ("swift", "Swift"),
            ("sh", "Shell"),
            ("nix", "Nix"),
            ("md", "Markdown"),
        ]
        .iter()
        .map(|(ext, lang)| (ext.to_string(), lang.to_string()))
        .collect();

        Self {
            enabled: true,
            max_depth: 6,
            max_files: 5000,
            exclude: [
                ".git",
                ".jj",
                "target",
                "node_modules",
                "vendor",
                "dist",
                "build",
                ".venv",
                "__pycache__",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            extensions,
        }
    }
}

/// Session-start context probe configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub enabled: bool,

    /// Text placed before the probe results
    pub preamble: Option<String>,

    pub tools: Vec<ToolProbeConfig>,
    pub markers: Vec<MarkerProbeConfig>,
    pub languages: LanguageConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preamble: None,
            tools: vec![
                ToolProbeConfig {
                    name: "jj".to_string(),
                    install: Some("cargo install --locked jj-cli".to_string()),
                },
                ToolProbeConfig {
                    name: "bd".to_string(),
                    install: Some("go install github.com/steveyegge/beads/cmd/bd@latest".to_string()),
                },
                ToolProbeConfig {
                    name: "direnv".to_string(),
                    install: Some("brew install direnv".to_string()),
                },
            ],
            markers: vec![
                MarkerProbeConfig {
                    name: "jj workspace".to_string(),
                    path: ".jj".to_string(),
                    init: Some("jj git init --colocate".to_string()),
                },
                MarkerProbeConfig {
                    name: "issue tracker".to_string(),
                    path: ".beads".to_string(),
                    init: Some("bd init".to_string()),
                },
                MarkerProbeConfig {
                    name: "environment".to_string(),
                    path: ".envrc".to_string(),
                    init: Some("direnv allow".to_string()),
                },
            ],
            languages: LanguageConfig::default(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub vcs: VcsConfig,
    pub search: SearchConfig,
    pub rules: Vec<RuleConfig>,
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from the first usable standard location, or defaults
    pub fn load(cwd: &Path) -> Self {
        let config_paths = [
            // Project config
            Some(cwd.join(".claude/hook-guard.toml")),
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/hook-guard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/hook-guard/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => return config,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether `tool` carries a shell command
    pub fn is_shell_tool(&self, tool: &str) -> bool {
        self.general.shell_tools.iter().any(|t| t == tool)
    }

    /// Whether `tool` carries a search query
    pub fn is_search_tool(&self, tool: &str) -> bool {
        self.general.search_tools.iter().any(|t| t == tool)
    }
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
enabled = true
audit_log = false
warn_only = false
shell_tools = ["Bash"]
search_tools = ["WebSearch"]
max_input_bytes = 1048576

[vcs]
enabled = true
program = "jj"

[search]
enabled = true
opt_out_keywords = ["historical"]

# Custom rules run before the built-in ones.
# decision: "deny" blocks, "flag" adds advice, "inert" stops checking the
# segment. "allow" answers permissionDecision "allow", which also skips the
# host's permission prompt for the call, so keep allow patterns narrow.
# [[rules]]
# id = "no-git-push"
# scope = "shell"
# decision = "deny"
# pattern = "\\bgit\\s+push\\b"
# reason = "Push with `jj git push` instead"

[session]
enabled = true

[[session.tools]]
name = "jj"
install = "cargo install --locked jj-cli"

[[session.tools]]
name = "bd"
install = "go install github.com/steveyegge/beads/cmd/bd@latest"

[[session.tools]]
name = "direnv"
install = "brew install direnv"

[[session.markers]]
name = "jj workspace"
path = ".jj"
init = "jj git init --colocate"

[[session.markers]]
name = "issue tracker"
path = ".beads"
init = "bd init"

[[session.markers]]
name = "environment"
path = ".envrc"
init = "direnv allow"

[session.languages]
enabled = true
max_depth = 6
max_files = 5000
"#;
