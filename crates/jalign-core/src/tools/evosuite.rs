//! EvoSuite test generation and execution against compiled classes.
//!
//! Scoring scrapes the JUnit summary line: `OK (N tests)` means a full
//! pass, `Tests run: N,  Failures: M` a partial one, and anything else —
//! including a harness that produced no output at all — scores 0.0.

use std::process::Command;

use tracing::warn;

use super::workdir::Workdir;
use super::ToolConfig;

/// A generated test class and its scaffolding, both Java source.
#[derive(Clone, Debug)]
pub struct GeneratedTests {
    pub test: String,
    pub scaffold: String,
}

/// Generate EvoSuite tests for a compiled class.  `None` on any failure.
pub fn generate_tests(
    config: &ToolConfig,
    class_name: &str,
    class_file: &[u8],
) -> Option<GeneratedTests> {
    let workdir = Workdir::new().ok()?;
    workdir
        .write_file(&format!("{class_name}.class"), class_file)
        .ok()?;

    let output = Command::new(&config.java)
        .arg("-jar")
        .arg(&config.evosuite_jar)
        .arg("-class")
        .arg(class_name)
        .arg("-projectCP")
        .arg(".")
        .arg("-Dsearch_budget=5")
        .current_dir(workdir.path())
        .output();
    match output {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            warn!(
                class = class_name,
                "evosuite failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }
        Err(error) => {
            warn!(class = class_name, "evosuite not runnable: {error}");
            return None;
        }
    }

    let test = workdir
        .read_to_string(&format!("evosuite-tests/{class_name}_ESTest.java"))
        .ok()?;
    let scaffold = workdir
        .read_to_string(&format!(
            "evosuite-tests/{class_name}_ESTest_scaffolding.java"
        ))
        .ok()?;
    Some(GeneratedTests { test, scaffold })
}

/// Compile and run previously generated tests against the given bytecode,
/// returning the fraction of passing test cases.
///
/// Every failure mode — compile error, harness crash, unparseable output —
/// reports as 0.0 so the per-sample driver can continue.
pub fn run_tests(
    config: &ToolConfig,
    class_name: &str,
    class_file: &[u8],
    test: &str,
    scaffold: &str,
) -> f64 {
    let workdir = match Workdir::new() {
        Ok(workdir) => workdir,
        Err(_) => return 0.0,
    };
    let test_file = format!("{class_name}_ESTest.java");
    let scaffold_file = format!("{class_name}_ESTest_scaffolding.java");
    let wrote = workdir
        .write_file(&format!("{class_name}.class"), class_file)
        .and_then(|_| workdir.write_file(&test_file, test.as_bytes()))
        .and_then(|_| workdir.write_file(&scaffold_file, scaffold.as_bytes()));
    if wrote.is_err() {
        return 0.0;
    }

    let classpath = config.runtime_classpath();
    let compiled = Command::new(&config.javac)
        .arg("-cp")
        .arg(&classpath)
        .arg(&test_file)
        .arg(&scaffold_file)
        .current_dir(workdir.path())
        .output();
    match compiled {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            warn!(
                class = class_name,
                "test compilation failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return 0.0;
        }
        Err(error) => {
            warn!(class = class_name, "javac not runnable: {error}");
            return 0.0;
        }
    }

    let run = Command::new(&config.java)
        .arg("-cp")
        .arg(&classpath)
        .arg("org.junit.runner.JUnitCore")
        .arg(format!("{class_name}_ESTest"))
        .current_dir(workdir.path())
        .output();
    match run {
        Ok(output) => {
            let combined = format!(
                "{}\n{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            parse_pass_rate(&combined)
        }
        Err(error) => {
            warn!(class = class_name, "java not runnable: {error}");
            0.0
        }
    }
}

/// Extract the pass rate from JUnit console output.
pub fn parse_pass_rate(output: &str) -> f64 {
    for line in output.lines().rev() {
        let line = line.trim();
        if line.starts_with("OK") {
            return 1.0;
        }
        if let Some(rest) = line.strip_prefix("Tests run: ") {
            let mut parts = rest.split(',');
            let runs = parts
                .next()
                .and_then(|part| part.trim().parse::<f64>().ok());
            let failures = parts
                .next()
                .and_then(|part| part.rsplit(": ").next())
                .and_then(|count| count.trim().parse::<f64>().ok());
            if let (Some(runs), Some(failures)) = (runs, failures) {
                if runs > 0.0 {
                    return 1.0 - failures / runs;
                }
            }
            return 0.0;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pass() {
        let output = "\
JUnit version 4.12
............
Time: 2.301

OK (12 tests)
";
        assert_eq!(parse_pass_rate(output), 1.0);
    }

    #[test]
    fn test_partial_pass() {
        let output = "\
Time: 1.87
There were 3 failures:
...
Tests run: 12,  Failures: 3
";
        assert_eq!(parse_pass_rate(output), 0.75);
    }

    #[test]
    fn test_all_failures() {
        assert_eq!(parse_pass_rate("Tests run: 4,  Failures: 4\n"), 0.0);
    }

    #[test]
    fn test_garbage_output_scores_zero() {
        assert_eq!(parse_pass_rate("Exception in thread \"main\""), 0.0);
        assert_eq!(parse_pass_rate(""), 0.0);
        assert_eq!(parse_pass_rate("Tests run: zero"), 0.0);
    }

    #[test]
    fn test_missing_tools_score_zero() {
        let config = ToolConfig {
            javac: "/nonexistent/javac".into(),
            java: "/nonexistent/java".into(),
            ..ToolConfig::default()
        };
        let rate = run_tests(&config, "X", b"", "class XT {}", "class XS {}");
        assert_eq!(rate, 0.0);
    }
}
