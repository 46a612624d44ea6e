// VecDocs — tests/runner_tests.rs
// Runner round trips on real files, using shell tools as the program command.
// Author: d65v <https://github.com/d65v>

#![cfg(unix)]

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use vecdocs::runner::{clean_file, list_programs, Env, Runner, RunnerConfig};
use vecdocs::VecDocsError;

fn config(exec: &str) -> RunnerConfig {
    RunnerConfig {
        env_file: None,
        exec: Some(exec.to_string()),
        ..RunnerConfig::default()
    }
}

fn env() -> Env {
    Env::from_pairs([
        ("YOUR_CLUSTER_ENDPOINT", "http://localhost:19530"),
        ("YOUR_CLUSTER_TOKEN", "root:Milvus"),
    ])
}

#[test]
fn test_run_writes_copy_and_masks_secrets() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("hello.py");
    let source = "print(\"YOUR_CLUSTER_TOKEN\")\n";
    fs::write(&src, source).unwrap();

    // `cat` prints the substituted program back, one line per print call
    let runner = Runner::with_env(config("cat {file}"), env());
    let report = runner.run(&src).unwrap();

    assert_eq!(report.prints, 1);
    assert_eq!(report.output_path, dir.path().canonicalize().unwrap().join("hello_copy.py"));
    assert_eq!(report.raw_output, source);

    let copy = fs::read_to_string(&report.output_path).unwrap();
    assert_eq!(
        copy,
        "print(\"YOUR_CLUSTER_TOKEN\")\n\n# Output:\n#\n# print(\"YOUR_CLUSTER_TOKEN\")\n\n"
    );
    assert!(!copy.contains("root:Milvus"));

    assert_eq!(fs::read_to_string(&src).unwrap(), source);
    assert!(!dir.path().join("helloTemp.py").exists());
}

#[test]
fn test_debug_keeps_temp_program() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("keep.py");
    fs::write(&src, "print(\"YOUR_CLUSTER_ENDPOINT\")\n").unwrap();

    let cfg = RunnerConfig {
        debug: true,
        ..config("cat {file}")
    };
    Runner::with_env(cfg, env()).run(&src).unwrap();

    let temp = fs::read_to_string(dir.path().join("keepTemp.py")).unwrap();
    assert_eq!(temp, "print(\"http://localhost:19530\")\n");
}

#[test]
fn test_rerun_in_place_is_stable() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("stable.py");
    fs::write(&src, "x = [1, 2, 3]\nprint(x)\n").unwrap();

    let cfg = RunnerConfig {
        write: true,
        ..config("echo [1,2,3]")
    };
    let runner = Runner::with_env(cfg, Env::default());

    runner.run(&src).unwrap();
    let first = fs::read_to_string(&src).unwrap();
    runner.run(&src).unwrap();
    let second = fs::read_to_string(&src).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        "x = [1, 2, 3]\nprint(x)\n\n# Output:\n# [\n#     1,\n#     2,\n#     3\n# ]\n\n"
    );
}

#[test]
fn test_in_place_program_is_restored() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.rs");
    let source = "fn main() {\n    println!(\"{}\", \"YOUR_CLUSTER_TOKEN\");\n}\n";
    fs::write(&src, source).unwrap();

    let runner = Runner::with_env(config("cat {file}"), env());
    let report = runner.run(&src).unwrap();

    assert_eq!(fs::read_to_string(&src).unwrap(), source);
    assert!(!dir.path().join("mainBackup.rs").exists());
    let copy = fs::read_to_string(report.output_path).unwrap();
    assert!(copy.contains("    // Output:\n    //\n    // fn main() {\n"));
}

#[test]
fn test_in_place_source_is_backed_up_while_running() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.rs");
    let source = "fn main() {\n    println!(\"{}\", \"YOUR_CLUSTER_TOKEN\");\n}\n";
    fs::write(&src, source).unwrap();

    // The program prints the backup, which must still hold the placeholder
    let runner = Runner::with_env(config("cat {dir}/mainBackup.rs"), env());
    let report = runner.run(&src).unwrap();

    assert_eq!(report.raw_output, source);
    assert!(!dir.path().join("mainBackup.rs").exists());
}

#[test]
fn test_interrupted_in_place_run_is_recovered() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.rs");
    let source = "fn main() {\n    println!(\"{}\", \"YOUR_CLUSTER_TOKEN\");\n}\n";
    // What a killed run leaves behind: secrets in the source, original in the backup
    fs::write(&src, source.replace("YOUR_CLUSTER_TOKEN", "root:Milvus")).unwrap();
    fs::write(dir.path().join("mainBackup.rs"), source).unwrap();

    let report = Runner::with_env(config("cat {file}"), env()).run(&src).unwrap();

    assert_eq!(fs::read_to_string(&src).unwrap(), source);
    assert!(!dir.path().join("mainBackup.rs").exists());
    let copy = fs::read_to_string(report.output_path).unwrap();
    assert!(!copy.contains("root:Milvus"));
}

#[test]
fn test_clean_recovers_interrupted_source() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("main.rs");
    fs::write(&src, "let t = \"root:Milvus\";\n").unwrap();
    fs::write(dir.path().join("mainBackup.rs"), "let t = \"YOUR_CLUSTER_TOKEN\";\n").unwrap();

    clean_file(&src, true).unwrap();

    assert_eq!(fs::read_to_string(&src).unwrap(), "let t = \"YOUR_CLUSTER_TOKEN\";\n");
    assert!(!dir.path().join("mainBackup.rs").exists());
}

#[test]
fn test_failed_program_restores_source() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("broken.rs");
    let source = "fn main() {\n    println!(\"YOUR_CLUSTER_ENDPOINT\");\n}\n";
    fs::write(&src, source).unwrap();

    let err = Runner::with_env(config("false"), env()).run(&src).unwrap_err();

    assert!(matches!(err, VecDocsError::CommandFailed(_)));
    assert_eq!(fs::read_to_string(&src).unwrap(), source);
    assert!(!dir.path().join("broken_copy.rs").exists());
}

#[test]
fn test_too_little_output_is_an_error() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("short.py");
    fs::write(&src, "print(1)\nprint(2)\n").unwrap();

    let err = Runner::with_env(config("echo 1"), Env::default())
        .run(&src)
        .unwrap_err();
    assert!(matches!(err, VecDocsError::OutputExhausted { line: 2 }));
}

#[test]
fn test_env_file_is_loaded() {
    let dir = tempdir().unwrap();
    let env_file = dir.path().join(".env");
    fs::write(&env_file, "YOUR_CLUSTER_TOKEN=\"root:Milvus\"\n").unwrap();

    let env = Env::load(&env_file).unwrap();
    assert_eq!(env.len(), 1);
    assert_eq!(env.substitute("t = YOUR_CLUSTER_TOKEN"), "t = root:Milvus");
}

#[test]
fn test_clean_and_list() {
    let dir = tempdir().unwrap();
    let spliced = "print(1)\n\n# Output:\n#\n# 1\n\nprint(2)\n";
    fs::write(dir.path().join("a.py"), spliced).unwrap();
    fs::write(dir.path().join("b.go"), "fmt.Println(1)\n").unwrap();
    fs::write(dir.path().join("a_copy.py"), "").unwrap();
    fs::write(dir.path().join("cBackup.py"), "print(1)\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "print(1)").unwrap();

    let out = clean_file(&dir.path().join("a.py"), false).unwrap();
    assert_eq!(fs::read_to_string(out).unwrap(), "print(1)\nprint(2)\n");

    let found = list_programs(dir.path()).unwrap();
    let names: Vec<(&str, usize)> = found
        .iter()
        .map(|(p, n)| (p.file_name().and_then(|s| s.to_str()).unwrap(), *n))
        .collect();
    assert_eq!(names, vec![("a.py", 2), ("b.go", 1)]);
    assert!(Path::new(&found[0].0).is_file());
}
