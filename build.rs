use std::{fs, path::Path, process::Command, time::SystemTime};

fn main() {
  let now = SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|d| d.as_millis())
    .unwrap_or(0);
  println!("cargo:rustc-env=BUILD_TIME={}", now);

  println!("cargo:rerun-if-changed=.git/HEAD");
  if Path::new(".git/refs/heads").exists() {
    println!("cargo:rerun-if-changed=.git/refs/heads");
  }

  let branch = git(&["rev-parse", "--abbrev-ref", "HEAD"]).or_else(head_branch);
  let commit = git(&["rev-parse", "HEAD"]);
  let commit_time = git(&["show", "-s", "--format=%ct", "HEAD"])
    .and_then(|s| s.parse::<u64>().ok())
    .map(|secs| secs * 1000)
    .unwrap_or(0);

  println!(
    "cargo:rustc-env=GIT_BRANCH={}",
    branch.unwrap_or_else(|| "unknown".to_string())
  );
  println!(
    "cargo:rustc-env=GIT_COMMIT={}",
    commit.unwrap_or_else(|| "unknown".to_string())
  );
  println!("cargo:rustc-env=GIT_COMMIT_TIME={}", commit_time);
}

fn git(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let out = String::from_utf8(output.stdout).ok()?;
  Some(out.trim().to_string()).filter(|s| !s.is_empty())
}

// Builds from a source tarball with a bare .git directory and no git binary.
fn head_branch() -> Option<String> {
  let head = fs::read_to_string(".git/HEAD").ok()?;
  let reference = head.strip_prefix("ref: ")?.trim();
  reference.rsplit('/').next().map(|s| s.to_string())
}
