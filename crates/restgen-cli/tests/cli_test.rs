//! End-to-end tests for the restgen CLI

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn restgen(args: &[&str]) -> Result<Output> {
    Command::new(env!("CARGO_BIN_EXE_restgen"))
        .args(args)
        .output()
        .context("Failed to run restgen")
}

#[test]
fn test_generate_writes_client_and_runtime() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let symbols = fixture("symbols.yaml");
    let output = restgen(&[
        "generate",
        "--symbols",
        symbols.to_str().context("fixture path")?,
        "--output-dir",
        dir.path().to_str().context("temp path")?,
    ])?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let client = std::fs::read_to_string(dir.path().join("Sample.Api.UserApi.g.cs"))?;
    assert!(client.starts_with("// <auto-generated/>"));
    assert!(client.contains("namespace Sample.Api;"));
    assert!(client.contains(
        "public HttpClient Http { get; } = new HttpClient { BaseAddress = new Uri(\"https://api.example.com/v1/\") };"
    ));
    assert!(client.contains(
        "public async partial Task<User> GetUser(int id, CancellationToken cancellationToken)"
    ));
    assert!(client.contains("ArgumentNullException.ThrowIfNull(user);"));
    assert!(client.contains("public void Dispose()"));

    // `tags` is a collection, so the search endpoint builds its URL at runtime
    assert!(client.contains("using RestGen.Runtime;"));
    assert!(dir.path().join("UrlBuilder.g.cs").exists());
    Ok(())
}

#[test]
fn test_dry_run_prints_without_writing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("never");
    let symbols = fixture("symbols.yaml");
    let output = restgen(&[
        "generate",
        "--symbols",
        symbols.to_str().context("fixture path")?,
        "--output-dir",
        out.to_str().context("temp path")?,
        "--dry-run",
    ])?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("// ---- Sample.Api.UserApi.g.cs ----"));
    assert!(stdout.contains("// ---- UrlBuilder.g.cs ----"));
    assert!(!out.exists());
    Ok(())
}

#[test]
fn test_inspect_dumps_models_as_json() -> Result<()> {
    let symbols = fixture("symbols.yaml");
    let output = restgen(&[
        "inspect",
        "--symbols",
        symbols.to_str().context("fixture path")?,
    ])?;
    assert!(output.status.success());

    let models: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let classes = models.as_array().context("array of classes")?;
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0]["name"], "UserApi");
    assert_eq!(classes[0]["client_name"], "Http");
    assert_eq!(classes[0]["methods"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn test_config_file_supplies_paths() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("Generated");
    let config = dir.path().join("restgen.toml");
    std::fs::write(
        &config,
        format!(
            "symbols_path = {:?}\noutput_dir = {:?}\n\n[options]\nemit_runtime = false\nindent = \"    \"\n",
            fixture("symbols.yaml"),
            out
        ),
    )?;

    let output = restgen(&["generate", "--config", config.to_str().context("config path")?])?;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.join("Sample.Api.UserApi.g.cs").exists());
    assert!(!out.join("UrlBuilder.g.cs").exists());
    Ok(())
}

#[test]
fn test_missing_symbols_is_an_error() -> Result<()> {
    let output = restgen(&["generate"])?;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No symbol table given"), "stderr: {stderr}");
    Ok(())
}
