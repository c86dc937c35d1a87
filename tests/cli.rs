use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use tempfile::tempdir;

fn outreach_gen() -> Command {
    let mut cmd = Command::cargo_bin("outreach-gen").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("OUTREACH_GEN_SEED")
        .env_remove("OUTREACH_GEN_COUNT")
        .env_remove("OUTREACH_GEN_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn spin_writes_csv_with_header_and_one_line_per_variant() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("variants.csv");

    outreach_gen()
        .args(["spin", "{Hi|Hello|Hey} [name], {thanks|cheers}", "--set", "name=Ada", "-n", "4"])
        .arg("-o")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "variant");
    // Every variant has a comma, so every data row is quoted
    for line in &lines[1..] {
        assert!(line.starts_with('"') && line.ends_with('"'), "unquoted row: {}", line);
        assert!(line.contains("Ada"));
    }
}

#[test]
fn output_without_csv_extension_is_plain_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("variants.txt");

    outreach_gen()
        .args(["spin", "{a|b}", "-n", "2", "--seed", "3"])
        .arg("-o")
        .arg(&path)
        .assert()
        .success();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("variant"));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn count_rejects_malformed_spintax() {
    outreach_gen()
        .args(["count", "{a|{b|c}}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed spintax at byte 3"));
}

#[test]
fn failures_are_reported_once() {
    let output = outreach_gen()
        .args(["count", "oops}"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(output).unwrap();
    assert_eq!(stderr.matches("Malformed spintax").count(), 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn text_argument_can_come_from_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("email.txt");
    fs::write(&path, "{Hi|Hello} [first_name], {a|b|c}").unwrap();

    let out = stdout_of(outreach_gen().arg("count").arg(format!("@{}", path.display())));
    assert_eq!(out.trim(), "6");

    let out = stdout_of(outreach_gen().arg("placeholders").arg(format!("@{}", path.display())));
    assert_eq!(out.trim(), "[first_name]");
}

#[test]
fn missing_file_after_at_sign_fails() {
    outreach_gen()
        .args(["count", "@/definitely/not/here.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error:"));
}

#[test]
fn set_without_a_name_is_rejected() {
    outreach_gen()
        .args(["fill", "Hi [name]", "--set", "=v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing placeholder name"));
}

#[test]
fn fill_and_skip() {
    let out = stdout_of(outreach_gen().args(["fill", "Hi [name], [topic]?", "--set", "name=Lin"]));
    assert_eq!(out.trim_end(), "Hi Lin, [topic]?");

    let out = stdout_of(outreach_gen().args(["fill", "Hi [name]", "--set", "name=Lin", "--skip"]));
    assert_eq!(out.trim_end(), "Hi [name]");
}

#[test]
fn domains_without_modifiers_print_only_bare_keyword() {
    let out = stdout_of(outreach_gen().args([
        "domains",
        "launch",
        "--ext",
        ".com",
        "--ext",
        ".io",
        "--no-prefixes",
        "--no-suffixes",
        "-n",
        "5",
    ]));
    let domains: HashSet<&str> = out.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(domains, HashSet::from(["launch.com", "launch.io"]));
}

#[test]
fn seed_makes_runs_reproducible() {
    let args = ["usernames", "--first-name", "Jordan", "--last-name", "Rivera", "-n", "8", "--seed", "21"];
    let first = stdout_of(outreach_gen().args(args));
    let second = stdout_of(outreach_gen().args(args));
    assert_eq!(first, second);
    assert_eq!(first.lines().count(), 8);
}

#[test]
fn synth_keeps_lowercase_matches_lowercase() {
    let out = stdout_of(outreach_gen().args(["synth", "say hi to the team"]));
    assert_eq!(out.trim_end(), "say {hi|hello|hey} to the team");
}

#[test]
fn unknown_zone_fails() {
    outreach_gen()
        .args(["convert", "10:00", "--from", "Mars/Olympus", "--to", "UTC"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timezone"));
}
