// VecDocs — runner.rs
// Runs an example program with real settings and writes its output back
// into the source as comments.
// Author: d65v <https://github.com/d65v>
//
// Pipeline per file:
//   strip old output blocks → substitute env placeholders (+ data paths)
//   → write temp / in-place copy → execute, capture stdout → splice each
//   output line under the print call that produced it → write result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command, Stdio};
use std::sync::{Mutex, MutexGuard, Once};

use regex::Regex;

use crate::format::pretty;
use crate::{Result, VecDocsError};

// ── Language Profiles ─────────────────────────────────────────────────────────

/// How to recognise, comment and execute programs of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub extension: &'static str,
    /// Substring marking a line that prints one line of output
    pub print_marker: &'static str,
    pub comment: &'static str,
    /// Default command; `{file}`, `{stem}` and `{dir}` are expanded
    pub command: &'static str,
    /// JSON indentation used in spliced output
    pub indent: &'static str,
    /// Run the substituted program from the source path itself
    pub in_place: bool,
}

pub const LANGUAGES: [Language; 4] = [
    Language {
        name: "rust",
        extension: "rs",
        print_marker: "println!",
        comment: "//",
        command: "cargo run --quiet --example {stem}",
        indent: "    ",
        in_place: true,
    },
    Language {
        name: "go",
        extension: "go",
        print_marker: "fmt.Println",
        comment: "//",
        command: "go run {file}",
        indent: "\t",
        in_place: false,
    },
    Language {
        name: "python",
        extension: "py",
        print_marker: "print(",
        comment: "#",
        command: "python3 {file}",
        indent: "    ",
        in_place: false,
    },
    Language {
        name: "javascript",
        extension: "js",
        print_marker: "console.log",
        comment: "//",
        command: "node {file}",
        indent: "    ",
        in_place: false,
    },
];

impl Language {
    pub fn detect(path: &Path) -> Option<&'static Language> {
        let ext = path.extension()?.to_str()?;
        LANGUAGES.iter().find(|l| l.extension == ext)
    }

    fn for_path(path: &Path) -> Result<&'static Language> {
        Self::detect(path).ok_or_else(|| {
            VecDocsError::InvalidParameter(format!(
                "no language profile for '{}'",
                path.display()
            ))
        })
    }

    /// Number of print calls in `source`.
    pub fn count_prints(&self, source: &str) -> usize {
        source.lines().filter(|l| l.contains(self.print_marker)).count()
    }

    fn output_block_regex(&self) -> Result<Regex> {
        let c = regex::escape(self.comment);
        let pattern = format!(
            r"\n[ \t]*\n[ \t]*{c} Output:[^\n]*(?:\n[ \t]*{c}[^\n]*)*\n[ \t]*(\n|$)",
            c = c
        );
        Regex::new(&pattern).map_err(|e| VecDocsError::InvalidParameter(e.to_string()))
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// `KEY="VALUE"` file; keys are the placeholders found in sources
    pub env_file: Option<PathBuf>,
    /// Overrides the language's default command
    pub exec: Option<String>,
    /// Rewrite the source instead of writing `<stem>_copy.<ext>`
    pub write: bool,
    /// Keep the temporary program
    pub debug: bool,
    /// Truncate spliced JSON arrays to this many items
    pub max_items: Option<usize>,
    pub data_marker: String,
    pub data_prefix: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            env_file: Some(PathBuf::from(".env")),
            exec: None,
            write: false,
            debug: false,
            max_items: None,
            data_marker: "DATA_FILE".to_string(),
            data_prefix: "../../".to_string(),
        }
    }
}

// ── Env Substitution ──────────────────────────────────────────────────────────

/// Placeholder → value pairs.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pairs: Vec<(String, String)>,
}

impl Env {
    pub fn from_pairs<K: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { pairs }
    }

    /// Read an env file. Quotes around values are removed.
    pub fn load(path: &Path) -> Result<Self> {
        let iter = dotenv::from_path_iter(path)
            .map_err(|e| VecDocsError::EnvFile(format!("{}: {}", path.display(), e)))?;
        let pairs = iter
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VecDocsError::EnvFile(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded {} placeholders from {}", pairs.len(), path.display());
        Ok(Self::from_pairs(pairs))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Replace placeholders with their values.
    pub fn substitute(&self, text: &str) -> String {
        self.pairs
            .iter()
            .fold(text.to_string(), |acc, (k, v)| acc.replace(k.as_str(), v))
    }

    /// Replace values with their placeholders.
    pub fn unsubstitute(&self, text: &str) -> String {
        let mut by_value: Vec<&(String, String)> =
            self.pairs.iter().filter(|(_, v)| !v.is_empty()).collect();
        by_value.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        by_value
            .into_iter()
            .fold(text.to_string(), |acc, (k, v)| acc.replace(v.as_str(), k))
    }
}

// ── Text Transforms ───────────────────────────────────────────────────────────

/// Remove output blocks spliced by an earlier run.
pub fn strip_outputs(source: &str, lang: &Language) -> Result<String> {
    let re = lang.output_block_regex()?;
    Ok(re.replace_all(source, "$1").into_owned())
}

/// The program text to execute: placeholders filled in and data paths
/// made relative to the program's own directory.
pub fn prepare_script(source: &str, env: &Env, data_marker: &str, data_prefix: &str) -> String {
    source
        .split('\n')
        .map(|line| {
            let line = env.substitute(line);
            if !data_marker.is_empty() && !data_prefix.is_empty() && line.contains(data_marker) {
                line.replace(data_prefix, "")
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert captured output under each print call.
///
/// Every print line consumes one output line. JSON output is
/// pretty-printed; anything else goes in as a single comment line.
pub fn splice(
    source: &str,
    output: &str,
    lang: &Language,
    env: &Env,
    max_items: Option<usize>,
) -> Result<String> {
    let mut outputs = output.lines();
    let c = lang.comment;
    let mut lines = Vec::new();

    for (n, line) in source.split('\n').enumerate() {
        if !line.contains(lang.print_marker) {
            lines.push(line.to_string());
            continue;
        }

        let text = outputs
            .next()
            .ok_or(VecDocsError::OutputExhausted { line: n + 1 })?;
        let text = env.unsubstitute(text);
        let indent: String = line.chars().take_while(|ch| ch.is_whitespace()).collect();
        let mut block = vec![format!("{}{} Output:", indent, c)];

        let trimmed = text.trim_start();
        let json = if trimmed.starts_with('[') || trimmed.starts_with('{') {
            match pretty(&text, lang.indent, max_items) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("line {}: output looks like JSON but is not ({})", n + 1, e);
                    None
                }
            }
        } else {
            None
        };

        match json {
            Some(p) => {
                for l in p.lines() {
                    block.push(format!("{}{} {}", indent, c, l).trim_end().to_string());
                }
            }
            None => {
                block.push(format!("{}{}", indent, c));
                block.push(format!("{}{} {}", indent, c, text).trim_end().to_string());
            }
        }

        lines.push(format!("{}\n\n{}\n", line, block.join("\n")));
    }

    if outputs.next().is_some() {
        log::warn!("program printed more lines than it has print calls");
    }
    Ok(lines.join("\n"))
}

// ── Files ─────────────────────────────────────────────────────────────────────

fn stem_and_ext(path: &Path) -> Result<(String, String)> {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let ext = path.extension().and_then(|s| s.to_str());
    match (stem, ext) {
        (Some(s), Some(e)) => Ok((s.to_string(), e.to_string())),
        _ => Err(VecDocsError::InvalidParameter(format!(
            "'{}' has no file name or extension",
            path.display()
        ))),
    }
}

fn sibling(path: &Path, suffix: &str) -> Result<PathBuf> {
    let (stem, ext) = stem_and_ext(path)?;
    Ok(path.with_file_name(format!("{}{}.{}", stem, suffix, ext)))
}

/// Where results go: the source itself, or `<stem>_copy.<ext>`.
pub fn output_path(path: &Path, write: bool) -> Result<PathBuf> {
    if write {
        Ok(path.to_path_buf())
    } else {
        sibling(path, "_copy")
    }
}

/// Temporary program path beside the source, `<stem>Temp.<ext>`.
pub fn temp_path(path: &Path) -> Result<PathBuf> {
    sibling(path, "Temp")
}

/// Copy of the pristine source kept while an in-place run has it
/// overwritten, `<stem>Backup.<ext>`.
pub fn backup_path(path: &Path) -> Result<PathBuf> {
    sibling(path, "Backup")
}

// ── Restore Guards ────────────────────────────────────────────────────────────

/// A file the runner has changed and must put back: either a source
/// rewritten in place (restored from its backup) or a temp program.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    path: PathBuf,
    backup: Option<PathBuf>,
}

impl Pending {
    /// Undo from disk alone; used when the process is interrupted.
    fn undo(&self) -> std::io::Result<()> {
        match &self.backup {
            Some(backup) => fs::rename(backup, &self.path),
            None => fs::remove_file(&self.path),
        }
    }
}

/// Files to put back if the process is interrupted mid-run.
static PENDING: Mutex<Vec<Pending>> = Mutex::new(Vec::new());
static INTERRUPT_HANDLER: Once = Once::new();

fn pending() -> MutexGuard<'static, Vec<Pending>> {
    PENDING.lock().unwrap_or_else(|e| e.into_inner())
}

fn install_interrupt_handler() {
    INTERRUPT_HANDLER.call_once(|| {
        let res = ctrlc::set_handler(|| {
            for p in pending().drain(..) {
                if let Err(e) = p.undo() {
                    log::error!("could not restore {}: {}", p.path.display(), e);
                }
            }
            process::exit(130);
        });
        if let Err(e) = res {
            log::warn!("no interrupt handler, an interrupted run may leave files changed: {}", e);
        }
    });
}

/// Puts a file back the way it was when dropped.
struct Restore {
    pending: Pending,
    original: Option<String>,
}

impl Restore {
    /// Guard an in-place rewrite. The original is on disk as a backup
    /// before the source is touched.
    fn in_place(path: &Path, original: String) -> Result<Self> {
        let backup = backup_path(path)?;
        fs::write(&backup, &original)?;
        Ok(Self::register(
            Pending {
                path: path.to_path_buf(),
                backup: Some(backup),
            },
            Some(original),
        ))
    }

    fn temp(path: &Path) -> Self {
        Self::register(
            Pending {
                path: path.to_path_buf(),
                backup: None,
            },
            None,
        )
    }

    fn register(pending_file: Pending, original: Option<String>) -> Self {
        install_interrupt_handler();
        pending().push(pending_file.clone());
        Self {
            pending: pending_file,
            original,
        }
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        pending().retain(|p| p != &self.pending);
        let path = &self.pending.path;
        let res = match &self.original {
            Some(text) => fs::write(path, text),
            None => fs::remove_file(path),
        };
        match res {
            Ok(()) => {
                if let Some(backup) = &self.pending.backup {
                    if let Err(e) = fs::remove_file(backup) {
                        log::warn!("could not remove {}: {}", backup.display(), e);
                    }
                }
            }
            // The backup stays so the next run can recover from it
            Err(e) => log::error!("could not restore {}: {}", path.display(), e),
        }
    }
}

/// Put back a source left rewritten by a run that was killed before its
/// guard ran. Returns whether a backup was found.
pub fn recover_source(path: &Path) -> Result<bool> {
    let backup = backup_path(path)?;
    if !backup.is_file() {
        return Ok(false);
    }
    log::warn!(
        "{} was left by an interrupted run, restoring {}",
        backup.display(),
        path.display()
    );
    fs::rename(&backup, path)?;
    Ok(true)
}

fn expand_command(template: &str, file: &Path) -> Result<Vec<String>> {
    let (stem, _) = stem_and_ext(file)?;
    let dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parts: Vec<String> = template
        .split_whitespace()
        .map(|part| {
            part.replace("{file}", &file.to_string_lossy())
                .replace("{stem}", &stem)
                .replace("{dir}", &dir.to_string_lossy())
        })
        .collect();
    if parts.is_empty() {
        return Err(VecDocsError::InvalidParameter("empty command".into()));
    }
    Ok(parts)
}

fn execute(argv: &[String], cwd: &Path) -> Result<String> {
    log::info!("$ {}", argv.join(" "));
    let output = Command::new(&argv[0])
        .args(&argv[1..])
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;

    if !output.status.success() {
        return Err(VecDocsError::CommandFailed(format!(
            "`{}` exited with {}",
            argv.join(" "),
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output_path: PathBuf,
    /// Captured stdout, placeholders restored
    pub raw_output: String,
    pub prints: usize,
}

pub struct Runner {
    config: RunnerConfig,
    env: Env,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        let env = match &config.env_file {
            Some(path) if path.exists() => Env::load(path)?,
            Some(path) => {
                log::warn!("env file {} not found, running without substitution", path.display());
                Env::default()
            }
            None => Env::default(),
        };
        Ok(Self { config, env })
    }

    pub fn with_env(config: RunnerConfig, env: Env) -> Self {
        Self { config, env }
    }

    pub fn run(&self, path: &Path) -> Result<RunReport> {
        let lang = Language::for_path(path)?;
        let path = &fs::canonicalize(path)?;
        recover_source(path)?;
        let raw = fs::read_to_string(path)?;
        let source = strip_outputs(&raw, lang)?;
        let script = prepare_script(
            &source,
            &self.env,
            &self.config.data_marker,
            &self.config.data_prefix,
        );

        let (run_path, guard) = if lang.in_place {
            let guard = Restore::in_place(path, raw)?;
            fs::write(path, &script)?;
            (path.to_path_buf(), Some(guard))
        } else {
            let temp = temp_path(path)?;
            fs::write(&temp, &script)?;
            let guard = (!self.config.debug).then(|| Restore::temp(&temp));
            (temp, guard)
        };

        let command = self.config.exec.as_deref().unwrap_or(lang.command);
        let argv = expand_command(command, &run_path)?;
        let cwd = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let stdout = execute(&argv, cwd);
        drop(guard);
        let stdout = stdout?;

        let spliced = splice(&source, &stdout, lang, &self.env, self.config.max_items)?;
        let output_path = output_path(path, self.config.write)?;
        fs::write(&output_path, spliced)?;

        let prints = lang.count_prints(&source);
        log::info!(
            "{}: {} print calls, wrote {}",
            path.display(),
            prints,
            output_path.display()
        );

        Ok(RunReport {
            output_path,
            raw_output: self.env.unsubstitute(&stdout),
            prints,
        })
    }
}

/// Strip spliced output without running anything.
pub fn clean_file(path: &Path, write: bool) -> Result<PathBuf> {
    let lang = Language::for_path(path)?;
    recover_source(path)?;
    let cleaned = strip_outputs(&fs::read_to_string(path)?, lang)?;
    let out = output_path(path, write)?;
    fs::write(&out, cleaned)?;
    Ok(out)
}

/// Example programs in `dir` with their print-call counts, sorted by path.
/// Runner artifacts (`*Temp.*`, `*Backup.*`, `*_copy.*`) are skipped.
pub fn list_programs(dir: &Path) -> Result<Vec<(PathBuf, usize)>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(lang) = Language::detect(&path) else {
            continue;
        };
        let (stem, _) = stem_and_ext(&path)?;
        if ["Temp", "Backup", "_copy"].iter().any(|s| stem.ends_with(s)) {
            continue;
        }
        let prints = lang.count_prints(&fs::read_to_string(&path)?);
        found.push((path, prints));
    }
    found.sort();
    Ok(found)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> &'static Language {
        Language::detect(Path::new("a.py")).unwrap()
    }

    fn rust() -> &'static Language {
        Language::detect(Path::new("a.rs")).unwrap()
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(python().name, "python");
        assert_eq!(Language::detect(Path::new("main.go")).unwrap().indent, "\t");
        assert!(Language::detect(Path::new("notes.txt")).is_none());
    }

    #[test]
    fn test_env_longest_key_first() {
        let env = Env::from_pairs([("TOKEN", "t"), ("CLUSTER_TOKEN", "abc")]);
        assert_eq!(env.substitute("CLUSTER_TOKEN TOKEN"), "abc t");
    }

    #[test]
    fn test_env_unsubstitute_skips_empty() {
        let env = Env::from_pairs([("YOUR_TOKEN", ""), ("YOUR_URI", "http://h:1")]);
        assert_eq!(env.unsubstitute("at http://h:1"), "at YOUR_URI");
    }

    #[test]
    fn test_prepare_script_data_paths() {
        let env = Env::from_pairs([("YOUR_URI", "http://h:1")]);
        let src = "uri = \"YOUR_URI\"\nDATA_FILE = \"../../data/a.json\"\nx = \"../../keep\"";
        let out = prepare_script(src, &env, "DATA_FILE", "../../");
        assert_eq!(
            out,
            "uri = \"http://h:1\"\nDATA_FILE = \"data/a.json\"\nx = \"../../keep\""
        );
    }

    #[test]
    fn test_splice_plain_and_json() {
        let src = "a = 1\nprint(a)\n    print(b)\nend";
        let out = "1\n[{\"id\":1}]\n";
        let spliced = splice(src, out, python(), &Env::default(), None).unwrap();
        let expected = "a = 1\nprint(a)\n\n# Output:\n#\n# 1\n\n    print(b)\n\n    # Output:\n    # [\n    #     {\n    #         \"id\": 1\n    #     }\n    # ]\n\nend";
        assert_eq!(spliced, expected);
    }

    #[test]
    fn test_splice_is_reversible() {
        let src = "fn main() {\n    println!(\"{}\", x);\n    // keep me\n    println!(\"done\");\n}\n";
        let spliced = splice(src, "[1,2]\ndone\n", rust(), &Env::default(), None).unwrap();
        assert!(spliced.contains("    // Output:\n    // [\n    //     1,"));
        assert_eq!(strip_outputs(&spliced, rust()).unwrap(), src);
    }

    #[test]
    fn test_splice_max_items() {
        let spliced = splice("print(v)", "[1,2,3]", python(), &Env::default(), Some(1)).unwrap();
        assert!(spliced.contains("\"(2 more items hidden)\""));
    }

    #[test]
    fn test_splice_output_exhausted() {
        let err = splice("print(a)\nprint(b)", "1\n", python(), &Env::default(), None).unwrap_err();
        assert!(matches!(err, VecDocsError::OutputExhausted { line: 2 }));
    }

    #[test]
    fn test_splice_masks_secrets() {
        let env = Env::from_pairs([("YOUR_CLUSTER_TOKEN", "root:Milvus")]);
        let spliced = splice("print(t)", "root:Milvus", python(), &env, None).unwrap();
        assert!(spliced.contains("# YOUR_CLUSTER_TOKEN"));
        assert!(!spliced.contains("Milvus"));
    }

    #[test]
    fn test_expand_command() {
        let argv = expand_command("cargo run --example {stem}", Path::new("/x/quick_start.rs")).unwrap();
        assert_eq!(argv, vec!["cargo", "run", "--example", "quick_start"]);
        let argv = expand_command("go run {file}", Path::new("main.go")).unwrap();
        assert_eq!(argv, vec!["go", "run", "main.go"]);
        assert!(expand_command("  ", Path::new("a.py")).is_err());
    }

    #[test]
    fn test_paths() {
        let p = Path::new("/x/quick_start.py");
        assert_eq!(temp_path(p).unwrap(), PathBuf::from("/x/quick_startTemp.py"));
        assert_eq!(output_path(p, false).unwrap(), PathBuf::from("/x/quick_start_copy.py"));
        assert_eq!(output_path(p, true).unwrap(), p);
        assert_eq!(backup_path(p).unwrap(), PathBuf::from("/x/quick_startBackup.py"));
    }

    #[test]
    fn test_restore_guard_deregisters() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let src = dir.join("guarded.rs");
        fs::write(&src, "changed").unwrap();

        let guard = Restore::in_place(&src, "original".to_string()).unwrap();
        assert!(pending().iter().any(|p| p.path == src));
        assert_eq!(fs::read_to_string(backup_path(&src).unwrap()).unwrap(), "original");
        drop(guard);

        assert!(!pending().iter().any(|p| p.path == src));
        assert_eq!(fs::read_to_string(&src).unwrap(), "original");
        assert!(!backup_path(&src).unwrap().exists());
    }

    #[test]
    fn test_pending_undo_restores_backup() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        let src = dir.join("killed.rs");
        let backup = backup_path(&src).unwrap();
        fs::write(&src, "token = root:Milvus").unwrap();
        fs::write(&backup, "token = YOUR_CLUSTER_TOKEN").unwrap();

        Pending { path: src.clone(), backup: Some(backup.clone()) }.undo().unwrap();

        assert_eq!(fs::read_to_string(&src).unwrap(), "token = YOUR_CLUSTER_TOKEN");
        assert!(!backup.exists());
    }
}
