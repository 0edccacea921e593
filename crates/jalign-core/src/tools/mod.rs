//! External tool collaborators: compiler, assembler/disassembler, test
//! generation, and decompilers.
//!
//! Every invocation runs inside an explicitly scoped working directory and
//! reports failure as a sentinel value (`None`, a failed outcome, or a 0.0
//! pass rate) — never as an error escaping to the per-sample driver.

pub mod decompile;
pub mod evosuite;
pub mod javac;
pub mod krakatau;
pub mod workdir;

use std::path::PathBuf;

/// Locations of the external binaries and jars.
///
/// Paths default to bare command names (resolved via `PATH`) and empty jar
/// lists; deployments override them through the environment.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    pub javac: PathBuf,
    pub java: PathBuf,
    /// Krakatau v2 binary, providing both `asm` and `dis` subcommands.
    pub krakatau: PathBuf,
    pub evosuite_jar: PathBuf,
    /// Jars put on the classpath when compiling and running generated
    /// tests (EvoSuite runtime, JUnit, Hamcrest).
    pub runtime_jars: Vec<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            javac: PathBuf::from("javac"),
            java: PathBuf::from("java"),
            krakatau: PathBuf::from("krak2"),
            evosuite_jar: PathBuf::from("evosuite.jar"),
            runtime_jars: Vec::new(),
        }
    }
}

impl ToolConfig {
    /// Read tool locations from the conventional environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            javac: env_path("JALIGN_JAVAC").unwrap_or(defaults.javac),
            java: env_path("JALIGN_JAVA").unwrap_or(defaults.java),
            krakatau: env_path("JALIGN_KRAKATAU").unwrap_or(defaults.krakatau),
            evosuite_jar: env_path("JALIGN_EVOSUITE_JAR").unwrap_or(defaults.evosuite_jar),
            runtime_jars: std::env::var("JALIGN_RUNTIME_JARS")
                .map(|joined| joined.split(':').map(PathBuf::from).collect())
                .unwrap_or_default(),
        }
    }

    /// Classpath string for test compilation and execution: the working
    /// directory plus every configured runtime jar.
    pub fn runtime_classpath(&self) -> String {
        let mut parts = vec![".".to_string()];
        parts.extend(
            self.runtime_jars
                .iter()
                .map(|jar| jar.display().to_string()),
        );
        parts.join(":")
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_runtime_classpath_is_cwd_only() {
        let config = ToolConfig::default();
        assert_eq!(config.runtime_classpath(), ".");
    }

    #[test]
    fn test_runtime_classpath_joins_jars() {
        let config = ToolConfig {
            runtime_jars: vec![PathBuf::from("a.jar"), PathBuf::from("b.jar")],
            ..ToolConfig::default()
        };
        assert_eq!(config.runtime_classpath(), ".:a.jar:b.jar");
    }
}
