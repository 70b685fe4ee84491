use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn fuzzdex_exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fuzzdex"))
}

fn fresh_dir(name: &str) -> PathBuf {
    let temp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&temp);
    fs::create_dir_all(&temp).unwrap();
    temp
}

fn create_dir_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (rel_path, content) in files {
        let full = root.join(rel_path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content).unwrap();
    }
}

fn run(args: &[&str]) -> Output {
    Command::new(fuzzdex_exe())
        .args(args)
        .output()
        .expect("Failed to run fuzzdex")
}

fn assert_success(output: &Output, what: &str) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "fuzzdex {} failed:\nstdout: {}\nstderr: {}",
        what,
        stdout,
        stderr
    );
    stdout
}

/// Prose-like bytes: word salad from a fixed LCG, so edits stay local.
fn document(seed: u32, len: usize) -> Vec<u8> {
    let words = [&b"lorem "[..], b"ipsum ", b"dolor ", b"sit ", b"amet,\n", b"consectetur "];
    let mut x = seed;
    let mut out = Vec::new();
    while out.len() < len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        out.extend_from_slice(words[((x >> 16) % words.len() as u32) as usize]);
    }
    out
}

#[test]
fn test_hash_listing_format() {
    let temp = fresh_dir("fuzzdex_e2e_hash");
    create_dir_tree(&temp, &[("one.txt", b"a"), ("sub/two.txt", &b"ab".repeat(10))]);

    let one = temp.join("one.txt");
    let stdout = assert_success(&run(&["hash", one.to_str().unwrap()]), "hash");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "ssdeep,1.1--blocksize:hash:hash,filename");
    assert_eq!(lines[1], format!("3:E:E,\"{}\"", one.to_str().unwrap().replace('\\', "/")));

    let stdout = assert_success(&run(&["hash", "--bare", "-r", temp.to_str().unwrap()]), "hash -r");
    let mut found: Vec<&str> = stdout.lines().collect();
    found.sort();
    assert_eq!(found, vec!["3:E:E", "3:ue:ue"]);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_compare_literals_and_files() {
    let a = "192:sdrtCMPFGVk+1cvtuIyeEUGZnhbvC6VsyYT6k8ylgKCaLizoQSbl:I5+7eVvwUL7gKCpzNSbl";
    let b = "192:/rtCMPFGVk+1cvtuIyeEUGZnhbvC6VsyYT6k8ylgKCaLizoQSbl:/5+7eVvwUL7gKCpzNSbl";
    let stdout = assert_success(&run(&["compare", a, b]), "compare");
    assert_eq!(stdout.trim(), "99");

    let temp = fresh_dir("fuzzdex_e2e_compare");
    let original = document(7, 30_000);
    let mut edited = original.clone();
    edited.truncate(29_000);
    create_dir_tree(&temp, &[("a.txt", &original), ("b.txt", &edited)]);

    let stdout = assert_success(
        &run(&[
            "compare",
            temp.join("a.txt").to_str().unwrap(),
            temp.join("b.txt").to_str().unwrap(),
        ]),
        "compare files",
    );
    let score: u32 = stdout.trim().parse().unwrap();
    assert!(score > 0 && score <= 100, "score was {}", score);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_compare_rejects_malformed() {
    let output = run(&["compare", "3:E", "3:E:E"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid fingerprint"), "stderr: {}", stderr);
}

#[test]
fn test_scan_then_match() {
    let temp = fresh_dir("fuzzdex_e2e_scan_match");
    let known_dir = temp.join("known");
    let suspect_dir = temp.join("suspect");
    let db = temp.join("sigs.fzdx");

    let report = document(1, 40_000);
    let mut report_v2 = report.clone();
    report_v2.splice(20_000..20_000, b"an inserted paragraph of text\n".iter().copied());
    let unrelated: Vec<u8> = (0..40_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();

    create_dir_tree(&known_dir, &[("report.txt", &report), ("notes/empty.txt", b"")]);
    create_dir_tree(
        &suspect_dir,
        &[("copy.txt", &report), ("report_v2.txt", &report_v2), ("noise.bin", &unrelated)],
    );

    let stdout = assert_success(
        &run(&["scan", "--dir", known_dir.to_str().unwrap(), "--output", db.to_str().unwrap()]),
        "scan",
    );
    assert!(stdout.contains("Files hashed: 2"), "stdout: {}", stdout);
    assert!(db.exists());

    let stdout = assert_success(
        &run(&["match", "--db", db.to_str().unwrap(), "--threshold", "50", suspect_dir.to_str().unwrap()]),
        "match",
    );

    let copy_line = stdout.lines().find(|l| l.contains("copy.txt")).expect("copy.txt not matched");
    assert!(copy_line.contains("\"report.txt\" (100) (identical)"), "line: {}", copy_line);
    let v2_line = stdout.lines().find(|l| l.contains("report_v2.txt")).expect("report_v2.txt not matched");
    assert!(v2_line.contains("\"report.txt\""), "line: {}", v2_line);
    assert!(!v2_line.contains("identical"));
    assert!(!stdout.contains("noise.bin"), "stdout: {}", stdout);

    let _ = fs::remove_dir_all(&temp);
}

#[test]
fn test_match_rejects_foreign_database() {
    let temp = fresh_dir("fuzzdex_e2e_bad_db");
    let db = temp.join("bogus.fzdx");
    fs::write(&db, b"not a database").unwrap();
    fs::write(temp.join("x.txt"), b"x").unwrap();

    let output = run(&["match", "--db", db.to_str().unwrap(), temp.join("x.txt").to_str().unwrap()]);
    assert!(!output.status.success());

    let _ = fs::remove_dir_all(&temp);
}
