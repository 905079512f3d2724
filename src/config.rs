/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD, or the XDG
/// data dir). Falls back to defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::sim::dead_end::DEFAULT_PASSES;
use crate::sim::generator::DEFAULT_ITERATIONS;
use crate::sim::visibility::DEFAULT_DEAD_CHAIN_HOPS;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub maze: MazeConfig,
    pub explore: ExploreConfig,
    pub navigation: NavigationConfig,
    pub log_file: PathBuf,
}

#[derive(Clone, Debug)]
pub struct MazeConfig {
    pub logical_width: usize,
    pub logical_height: usize,
    pub iterations: usize,
    pub seed: Option<u64>,   // None = seed from entropy
    pub align_width: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExploreConfig {
    pub dead_chain_hops: usize,
    pub classify_passes: usize,
}

#[derive(Clone, Debug)]
pub struct NavigationConfig {
    pub path_display_ms: u64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    maze: TomlMaze,
    #[serde(default)]
    explore: TomlExplore,
    #[serde(default)]
    navigation: TomlNavigation,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_logical_size")]
    logical_width: usize,
    #[serde(default = "default_logical_size")]
    logical_height: usize,
    #[serde(default = "default_iterations")]
    iterations: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_align_width")]
    align_width: bool,
}

#[derive(Deserialize, Debug)]
struct TomlExplore {
    #[serde(default = "default_dead_chain_hops")]
    dead_chain_hops: usize,
    #[serde(default = "default_classify_passes")]
    classify_passes: usize,
}

#[derive(Deserialize, Debug)]
struct TomlNavigation {
    #[serde(default = "default_path_display")]
    path_display_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_logical_size() -> usize { 23 }   // 48x48 wall grid
fn default_iterations() -> usize { DEFAULT_ITERATIONS }
fn default_align_width() -> bool { true }
fn default_dead_chain_hops() -> usize { DEFAULT_DEAD_CHAIN_HOPS }
fn default_classify_passes() -> usize { DEFAULT_PASSES }
fn default_path_display() -> u64 { 500 }
fn default_log_file() -> String { "mazewalk.log".into() }

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze {
            logical_width: default_logical_size(),
            logical_height: default_logical_size(),
            iterations: default_iterations(),
            seed: None,
            align_width: default_align_width(),
        }
    }
}

impl Default for TomlExplore {
    fn default() -> Self {
        TomlExplore {
            dead_chain_hops: default_dead_chain_hops(),
            classify_passes: default_classify_passes(),
        }
    }
}

impl Default for TomlNavigation {
    fn default() -> Self {
        TomlNavigation { path_display_ms: default_path_display() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral { log_file: default_log_file() }
    }
}

impl Default for ExploreConfig {
    fn default() -> Self {
        ExploreConfig {
            dead_chain_hops: DEFAULT_DEAD_CHAIN_HOPS,
            classify_passes: DEFAULT_PASSES,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory, (3) XDG data dir.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Runs before logging is set up (the log file comes from here), so a
    /// file that exists but can't be used is reported back for the caller
    /// to log once it can.
    pub fn load() -> (Self, Option<String>) {
        let (cfg, problem) = load_toml(&candidate_dirs());
        (Self::from_toml(cfg), problem)
    }

    /// Parse config text. Unknown keys are ignored; missing keys take defaults.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Self::from_toml)
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        GameConfig {
            maze: MazeConfig {
                logical_width: cfg.maze.logical_width,
                logical_height: cfg.maze.logical_height,
                iterations: cfg.maze.iterations,
                seed: cfg.maze.seed,
                align_width: cfg.maze.align_width,
            },
            explore: ExploreConfig {
                dead_chain_hops: cfg.explore.dead_chain_hops,
                classify_passes: cfg.explore.classify_passes,
            },
            navigation: NavigationConfig {
                path_display_ms: cfg.navigation.path_display_ms,
            },
            log_file: PathBuf::from(cfg.general.log_file),
        }
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (symlinks resolved)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/mazewalk)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/mazewalk");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
/// The first file found wins; if it is unusable, defaults apply and the
/// reason is returned.
fn load_toml(search_dirs: &[PathBuf]) -> (TomlConfig, Option<String>) {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return match read_toml(&path) {
                Ok(cfg) => (cfg, None),
                Err(problem) => (TomlConfig::default(), Some(problem)),
            };
        }
    }
    (TomlConfig::default(), None)
}

fn read_toml(path: &Path) -> Result<TomlConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {e}", path.display()))?;
    toml::from_str::<TomlConfig>(&text)
        .map_err(|e| format!("{} parse error: {e}; using default settings", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::parse("").unwrap();
        assert_eq!(cfg.maze.logical_width, 23);
        assert_eq!(cfg.maze.iterations, DEFAULT_ITERATIONS);
        assert_eq!(cfg.maze.seed, None);
        assert!(cfg.maze.align_width);
        assert_eq!(cfg.explore, ExploreConfig::default());
        assert_eq!(cfg.navigation.path_display_ms, 500);
        assert_eq!(cfg.log_file, PathBuf::from("mazewalk.log"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::parse(
            "[maze]\nlogical_width = 7\nseed = 42\n\n[explore]\ndead_chain_hops = 5\n",
        ).unwrap();
        assert_eq!(cfg.maze.logical_width, 7);
        assert_eq!(cfg.maze.logical_height, 23);
        assert_eq!(cfg.maze.seed, Some(42));
        assert_eq!(cfg.explore.dead_chain_hops, 5);
        assert_eq!(cfg.explore.classify_passes, DEFAULT_PASSES);
    }

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mazewalk-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn broken_file_falls_back_with_a_reason() {
        let dir = scratch_dir("broken");
        std::fs::write(dir.join("config.toml"), "[maze]\nlogical_width = \"wide\"\n").unwrap();

        let (cfg, problem) = load_toml(&[dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(GameConfig::from_toml(cfg).maze.logical_width, 23);
        let problem = problem.expect("parse failure is reported");
        assert!(problem.contains("parse error"), "{problem}");
    }

    #[test]
    fn good_file_is_used_without_complaint() {
        let dir = scratch_dir("good");
        std::fs::write(dir.join("config.toml"), "[maze]\nlogical_width = 7\n").unwrap();

        let (cfg, problem) = load_toml(&[dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(cfg.maze.logical_width, 7);
        assert!(problem.is_none());
    }

    #[test]
    fn missing_file_is_not_a_problem() {
        let dir = scratch_dir("missing");
        let (cfg, problem) = load_toml(&[dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(cfg.maze.logical_width, 23);
        assert!(problem.is_none());
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(GameConfig::parse("[maze]\nlogical_width = \"wide\"\n").is_err());
    }
}
