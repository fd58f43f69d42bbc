//! hook-guard - Tool-invocation guard and context injector for Claude Code
//!
//! # Usage
//!
//! ```bash
//! # As a PreToolUse hook (reads JSON from stdin, writes JSON to stdout)
//! echo '{"tool_name":"Bash","tool_input":{"command":"jj split"}}' | hook-guard
//!
//! # As a SessionStart hook
//! hook-guard --event session-start < /dev/null
//!
//! # Dry-run mode (report denials as context instead of blocking)
//! hook-guard --dry-run
//!
//! # Start a project config from the defaults
//! hook-guard --print-config > .claude/hook-guard.toml
//! ```

use std::env;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use hook_guard::{
    audit::AuditLogger,
    config::{Config, DEFAULT_CONFIG_TOML},
    engine::{clock::SystemClock, GuardEngine},
    hook::Invocation,
    input::EventKind,
    output::HookOutput,
    probe::env::SystemEnvironment,
};

/// Print version information
fn print_version() {
    println!("hook-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"hook-guard - Tool-invocation guard and context injector for Claude Code

USAGE:
    hook-guard [OPTIONS]

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -e, --event KIND        Event kind when the payload has none:
                            session-start, pre-tool-use
    -d, --dry-run           Report denials as context instead of blocking
    -c, --config PATH       Path to config file
    --print-config          Print the default configuration and exit

ENVIRONMENT:
    HOOK_GUARD_DISABLED=1   Answer every event with no opinion
    HOOK_GUARD_AUDIT=1      Write one JSON line per decision to stderr

USAGE AS HOOK:
    Configure in ~/.claude/settings.json:
    {{
      "hooks": {{
        "SessionStart": [{{
          "hooks": [{{ "type": "command", "command": "hook-guard --event session-start" }}]
        }}],
        "PreToolUse": [{{
          "matcher": "Bash|WebSearch",
          "hooks": [{{ "type": "command", "command": "hook-guard", "timeout": 5 }}]
        }}]
      }}
    }}
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    print_config: bool,
    event: Option<EventKind>,
    dry_run: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            print_config: false,
            event: None,
            dry_run: false,
            config_path: None,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--print-config" => result.print_config = true,
                "-e" | "--event" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.event = Self::event(&args[i]);
                    }
                }
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(args[i].clone());
                    }
                }
                arg if arg.starts_with("--event=") => {
                    result.event = Self::event(arg.trim_start_matches("--event="));
                }
                arg if arg.starts_with("--config=") => {
                    let path = arg.trim_start_matches("--config=");
                    result.config_path = Some(path.to_string());
                }
                other => eprintln!("Warning: Ignoring unknown argument {}", other),
            }
            i += 1;
        }

        result
    }

    fn event(name: &str) -> Option<EventKind> {
        let kind = EventKind::from_name(name);
        if kind.is_none() {
            eprintln!("Warning: Unknown event kind {}", name);
        }
        kind
    }
}

/// Resolve configuration; any failure falls back to defaults
fn load_config(args: &Args, cwd: &Path) -> Config {
    let mut config = match args.config_path {
        Some(ref path) => Config::load_from(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Config::default()
        }),
        None => Config::load(cwd),
    };

    if args.dry_run {
        config.general.warn_only = true;
    }
    if env::var_os("HOOK_GUARD_AUDIT").is_some() {
        config.general.audit_log = true;
    }

    config
}

fn run(args: &Args) -> HookOutput {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(args, &cwd);

    let mut logger = if config.general.audit_log {
        AuditLogger::stderr()
    } else {
        AuditLogger::default()
    };

    let engine = GuardEngine::new(config);
    let workspace = SystemEnvironment::new(cwd);
    let invocation = Invocation {
        engine: &engine,
        clock: &SystemClock,
        env: &workspace,
        forced_kind: args.event,
        disabled: env::var_os("HOOK_GUARD_DISABLED").is_some(),
    };

    invocation.process(io::stdin().lock(), &mut logger)
}

fn main() {
    let args = Args::parse();

    // Handle help and version
    if args.help {
        print_help();
        return;
    }

    if args.version {
        print_version();
        return;
    }

    if args.print_config {
        print!("{}", DEFAULT_CONFIG_TOML.trim_start());
        return;
    }

    // Anything that escapes `run` still yields a no-opinion response
    let output = panic::catch_unwind(AssertUnwindSafe(|| run(&args))).unwrap_or_else(|_| {
        eprintln!("Error: hook-guard failed internally; answering with no opinion");
        HookOutput::suppressed()
    });

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", output.to_json());
    let _ = handle.flush();
}
