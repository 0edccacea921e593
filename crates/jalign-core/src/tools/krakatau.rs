//! Round-trip between jasm listings and class-file bytecode via the
//! Krakatau assembler/disassembler.

use std::process::Command;

use tracing::warn;

use super::workdir::Workdir;
use super::ToolConfig;

/// Assemble a jasm listing into class-file bytes.  `None` on any failure.
pub fn assemble(config: &ToolConfig, class_name: &str, jasm_code: &str) -> Option<Vec<u8>> {
    let workdir = Workdir::new().ok()?;
    let input = format!("{class_name}.j");
    workdir.write_file(&input, jasm_code.as_bytes()).ok()?;

    let output = Command::new(&config.krakatau)
        .arg("asm")
        .arg("--out")
        .arg(".")
        .arg(&input)
        .current_dir(workdir.path())
        .output();
    if !run_succeeded(output, "assemble", class_name) {
        return None;
    }

    workdir.read_file(&format!("{class_name}.class")).ok()
}

/// Disassemble class-file bytes into a jasm listing.  `None` on any
/// failure.
pub fn disassemble(config: &ToolConfig, class_name: &str, class_file: &[u8]) -> Option<String> {
    let workdir = Workdir::new().ok()?;
    let input = format!("{class_name}.class");
    workdir.write_file(&input, class_file).ok()?;

    let output = Command::new(&config.krakatau)
        .arg("dis")
        .arg("--out")
        .arg(".")
        .arg(&input)
        .current_dir(workdir.path())
        .output();
    if !run_succeeded(output, "disassemble", class_name) {
        return None;
    }

    workdir.read_to_string(&format!("{class_name}.j")).ok()
}

fn run_succeeded(
    output: std::io::Result<std::process::Output>,
    operation: &str,
    class_name: &str,
) -> bool {
    match output {
        Ok(output) if output.status.success() => true,
        Ok(output) => {
            warn!(
                class = class_name,
                operation,
                "krakatau failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            false
        }
        Err(error) => {
            warn!(class = class_name, operation, "krakatau not runnable: {error}");
            false
        }
    }
}
