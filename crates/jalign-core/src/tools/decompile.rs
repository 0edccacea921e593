//! Pluggable third-party decompilers, used for benchmarking generated
//! translations against conventional tooling.

use std::path::PathBuf;
use std::process::Command;

use tracing::warn;

use super::workdir::Workdir;
use super::ToolConfig;

/// One interchangeable decompiler backend.
pub trait Decompiler {
    fn id(&self) -> &str;

    /// Decompile class-file bytes to Java source.  `None` on any failure.
    fn decompile(&self, class_name: &str, class_file: &[u8]) -> Option<String>;
}

/// Command-line flavor of a jar-packaged decompiler.
#[derive(Clone, Copy, Debug)]
pub enum JarFlavor {
    /// `java -jar cfr.jar Foo.class --outputdir <dir>`
    Cfr,
    /// `java -jar procyon.jar -o <dir> Foo.class`
    Procyon,
    /// `java -jar fernflower.jar Foo.class <dir>`
    Fernflower,
}

/// A decompiler shipped as an executable jar.
pub struct JarDecompiler {
    id: String,
    flavor: JarFlavor,
    jar: PathBuf,
    java: PathBuf,
}

impl JarDecompiler {
    pub fn new(id: &str, flavor: JarFlavor, jar: PathBuf, java: PathBuf) -> Self {
        Self {
            id: id.to_string(),
            flavor,
            jar,
            java,
        }
    }
}

impl Decompiler for JarDecompiler {
    fn id(&self) -> &str {
        &self.id
    }

    fn decompile(&self, class_name: &str, class_file: &[u8]) -> Option<String> {
        let workdir = Workdir::new().ok()?;
        let input = format!("{class_name}.class");
        workdir.write_file(&input, class_file).ok()?;

        let mut command = Command::new(&self.java);
        command.arg("-jar").arg(&self.jar);
        match self.flavor {
            JarFlavor::Cfr => {
                command.arg(&input).arg("--outputdir").arg("out");
            }
            JarFlavor::Procyon => {
                command.arg("-o").arg("out").arg(&input);
            }
            JarFlavor::Fernflower => {
                std::fs::create_dir_all(workdir.path().join("out")).ok()?;
                command.arg(&input).arg("out");
            }
        }

        let output = command.current_dir(workdir.path()).output();
        match output {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                warn!(
                    decompiler = %self.id,
                    class = class_name,
                    "decompilation failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                return None;
            }
            Err(error) => {
                warn!(decompiler = %self.id, "decompiler not runnable: {error}");
                return None;
            }
        }

        // Every flavor writes <class>.java somewhere under out/; CFR nests
        // it by package, so search rather than assume a flat layout.
        find_java_output(workdir.path().join("out"), class_name)
    }
}

fn find_java_output(root: PathBuf, class_name: &str) -> Option<String> {
    let wanted = std::ffi::OsString::from(format!("{class_name}.java"));
    let mut pending = vec![root];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.file_name() == Some(wanted.as_os_str()) {
                return std::fs::read_to_string(&path).ok();
            }
        }
    }
    None
}

/// Decompiler backends configured through the environment; unset jars are
/// simply absent from the returned set.
pub fn configured_decompilers(config: &ToolConfig) -> Vec<JarDecompiler> {
    let candidates = [
        ("cfr", JarFlavor::Cfr, "JALIGN_CFR_JAR"),
        ("procyon", JarFlavor::Procyon, "JALIGN_PROCYON_JAR"),
        ("fernflower", JarFlavor::Fernflower, "JALIGN_FERNFLOWER_JAR"),
    ];
    candidates
        .into_iter()
        .filter_map(|(id, flavor, variable)| {
            std::env::var_os(variable).map(|jar| {
                JarDecompiler::new(id, flavor, PathBuf::from(jar), config.java.clone())
            })
        })
        .collect()
}
