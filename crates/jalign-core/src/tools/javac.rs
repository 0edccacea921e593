//! Compilation of one class through an external `javac`.

use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::workdir::Workdir;
use super::ToolConfig;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([A-Za-z0-9_.*]+)\s*;").unwrap()
});

/// Outcome of one compilation attempt.  `error` carries the compiler's
/// diagnostics (or the local rejection reason) when `success` is false.
#[derive(Clone, Debug)]
pub struct CompileOutcome {
    pub success: bool,
    pub class_file: Option<Vec<u8>>,
    pub error: String,
}

impl CompileOutcome {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            class_file: None,
            error,
        }
    }
}

/// Compile one class and return its bytecode.
///
/// Sources importing anything outside the standard library are rejected
/// up front, without invoking the compiler: generated code routinely
/// hallucinates third-party imports, and spawning `javac` on them only to
/// fail is the dominant cost.
pub fn compile(config: &ToolConfig, class_name: &str, java_source: &str) -> CompileOutcome {
    if let Some(unresolved) = first_unresolved_import(java_source) {
        debug!(class = class_name, import = %unresolved, "rejected before compilation");
        return CompileOutcome::failure(format!("unresolved import: {unresolved}"));
    }

    let workdir = match Workdir::new() {
        Ok(workdir) => workdir,
        Err(error) => return CompileOutcome::failure(error.to_string()),
    };
    let java_file = format!("{class_name}.java");
    if let Err(error) = workdir.write_file(&java_file, java_source.as_bytes()) {
        return CompileOutcome::failure(error.to_string());
    }

    let output = Command::new(&config.javac)
        .arg("-cp")
        .arg(".")
        .arg(&java_file)
        .current_dir(workdir.path())
        .output();
    let output = match output {
        Ok(output) => output,
        Err(error) => {
            return CompileOutcome::failure(format!(
                "failed to run {}: {error}",
                config.javac.display()
            ))
        }
    };
    if !output.status.success() {
        return CompileOutcome::failure(String::from_utf8_lossy(&output.stderr).into_owned());
    }

    match workdir.read_file(&format!("{class_name}.class")) {
        Ok(bytes) => CompileOutcome {
            success: true,
            class_file: Some(bytes),
            error: String::new(),
        },
        Err(error) => CompileOutcome::failure(error.to_string()),
    }
}

/// First import that does not resolve within the standard library.
pub fn first_unresolved_import(java_source: &str) -> Option<String> {
    for captures in IMPORT_RE.captures_iter(java_source) {
        let module = &captures[1];
        if !(module.starts_with("java.") || module.starts_with("javax.")) {
            return Some(module.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_library_imports_pass() {
        let source = "\
import java.util.List;
import javax.swing.JFrame;
import java.math.BigInteger;

public class Fine {}
";
        assert_eq!(first_unresolved_import(source), None);
    }

    #[test]
    fn test_third_party_import_detected() {
        let source = "\
import java.util.List;
import org.apache.commons.lang.StringUtils;

public class NotFine {}
";
        assert_eq!(
            first_unresolved_import(source).as_deref(),
            Some("org.apache.commons.lang.StringUtils")
        );
    }

    #[test]
    fn test_static_and_wildcard_imports_handled() {
        assert_eq!(
            first_unresolved_import("import static java.lang.Math.max;\n"),
            None
        );
        assert_eq!(
            first_unresolved_import("import com.example.*;\n").as_deref(),
            Some("com.example.*")
        );
    }

    #[test]
    fn test_unresolved_import_fails_without_compiler() {
        // The configured javac does not exist; the pre-check must reject
        // the source before the spawn is even attempted.
        let config = ToolConfig {
            javac: "/nonexistent/javac".into(),
            ..ToolConfig::default()
        };
        let outcome = compile(&config, "X", "import com.example.Gone;\npublic class X {}\n");
        assert!(!outcome.success);
        assert!(outcome.error.contains("unresolved import"));
    }

    #[test]
    fn test_missing_compiler_is_a_failure_outcome() {
        let config = ToolConfig {
            javac: "/nonexistent/javac".into(),
            ..ToolConfig::default()
        };
        let outcome = compile(&config, "X", "public class X {}\n");
        assert!(!outcome.success);
        assert!(outcome.class_file.is_none());
    }
}
