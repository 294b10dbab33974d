//!  Wayfarer Amadeus Gateway
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! MCP server binary tests using subprocess with stdio transport.

#![cfg(feature = "mcp")]


use anyhow::{Context, Result};
use mock_helpers::*;
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tokio::time::Duration;

const CONFIG_VARS: [&str; 7] = [
    "AMADEUS_CLIENT_ID",
    "AMADEUS_CLIENT_SECRET",
    "AMADEUS_BASE_URL",
    "AMADEUS_TIMEOUT_SECS",
    "AMADEUS_QPS",
    "AMADEUS_READ_RETRIES",
    "AMADEUS_TOKEN_MARGIN_SECS",
];

fn find_binary() -> Result<PathBuf> {
    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR")
            .map_err(|e| anyhow::anyhow!("CARGO_MANIFEST_DIR not set: {}", e))?,
    );
    let workspace_root = manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .ok_or_else(|| anyhow::anyhow!("Could not determine workspace root"))?;

    let paths = [
        workspace_root.join("target/debug/wayfarer-amadeus-mcp"),
        workspace_root.join("target/release/wayfarer-amadeus-mcp"),
    ];

    for path in &paths {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }
    anyhow::bail!(
        "Could not find wayfarer-amadeus-mcp binary. Run `cargo build -p wayfarer-amadeus-gateway` first. Searched: {:?}",
        paths
    )
}

fn load_schema_from_file(name: &str) -> Result<Value> {
    let manifest_dir = PathBuf::from(
        std::env::var("CARGO_MANIFEST_DIR")
            .map_err(|e| anyhow::anyhow!("CARGO_MANIFEST_DIR not set: {}", e))?,
    );
    let schema_path = manifest_dir.join("tests").join("schemas").join(name);
    let content = std::fs::read_to_string(&schema_path)
        .context(format!("Failed to read schema file: {:?}", schema_path))?;
    serde_json::from_str(&content).context(format!("Failed to parse schema file: {:?}", schema_path))
}

fn validate_json_schema(instance: &Value, schema: &Value, schema_name: &str) -> Result<()> {
    let validator = jsonschema::Validator::new(schema)
        .context(format!("Failed to create validator for {}", schema_name))?;
    let errors: Vec<String> = validator
        .iter_errors(instance)
        .map(|e| format!("{}: {}", schema_name, e))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("Schema validation failed for {}:\n{}", schema_name, errors.join("\n"))
    }
}

/// Command with no Amadeus settings inherited and no `.env` in reach.
fn clean_command(path: &Path) -> Command {
    let mut cmd = Command::new(path);
    cmd.current_dir(std::env::temp_dir());
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

async fn send(stdin: &mut ChildStdin, message: Value) -> Result<()> {
    let mut line = message.to_string();
    line.push('\n');
    stdin.write_all(line.as_bytes()).await?;
    Ok(())
}

async fn receive(stdout: &mut BufReader<ChildStdout>) -> Result<Value> {
    let mut line = String::new();
    tokio::time::timeout(Duration::from_secs(10), stdout.read_line(&mut line)).await??;
    Ok(serde_json::from_str(&line)?)
}

#[tokio::test]
async fn test_mcp_help_output() -> Result<()> {
    let path = find_binary()?;
    let output = clean_command(&path).arg("--help").output().await?;

    assert!(output.status.success(), "Help should succeed without configuration");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wayfarer-amadeus-mcp"), "Help should show binary name");
    assert!(stdout.contains("stdio"), "Help should show stdio command");
    assert!(stdout.contains("http"), "Help should show http command");
    assert!(stdout.contains("AMADEUS_QPS"), "Help should name the environment variables");
    assert!(stdout.contains("--client-id"), "Help should show the settings flags");

    Ok(())
}

#[tokio::test]
async fn test_mcp_version_output() -> Result<()> {
    let path = find_binary()?;
    let output = clean_command(&path).arg("--version").output().await?;

    assert!(output.status.success(), "Version should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.1.0"), "Version should show 0.1.0");

    Ok(())
}

#[tokio::test]
async fn test_missing_credentials_stop_before_serving() -> Result<()> {
    let path = find_binary()?;
    let output = tokio::time::timeout(
        Duration::from_secs(10),
        clean_command(&path)
            .arg("stdio")
            .stdin(Stdio::null())
            .output(),
    )
    .await??;

    assert!(!output.status.success(), "Server must not start without credentials");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("AMADEUS_CLIENT_ID"), "stderr: {}", stderr);

    Ok(())
}

#[tokio::test]
async fn test_invalid_setting_is_rejected() -> Result<()> {
    let path = find_binary()?;
    let output = clean_command(&path)
        .env("AMADEUS_CLIENT_ID", CLIENT_ID)
        .env("AMADEUS_CLIENT_SECRET", CLIENT_SECRET)
        .env("AMADEUS_QPS", "fast")
        .arg("stdio")
        .stdin(Stdio::null())
        .output()
        .await?;

    assert!(!output.status.success(), "A malformed rate limit must be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--qps"), "stderr: {}", stderr);

    Ok(())
}

#[tokio::test]
async fn test_stdio_lists_and_calls_tools() -> Result<()> {
    let mut server = Server::new_async().await;
    let token = mock_token(&mut server, "stdio-token", 1).await;
    let cities = server
        .mock("GET", "/v1/reference-data/locations/cities")
        .match_header("authorization", bearer("stdio-token").as_str())
        .match_query(Matcher::UrlEncoded("keyword".into(), "Dub".into()))
        .with_status(200)
        .with_body(
            json!({"data": [{"name": "Dubai", "iataCode": "DXB",
                             "address": {"countryCode": "AE"}}]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let path = find_binary()?;
    let mut child = clean_command(&path)
        .arg("stdio")
        .env("AMADEUS_CLIENT_ID", CLIENT_ID)
        .env("AMADEUS_CLIENT_SECRET", CLIENT_SECRET)
        .env("AMADEUS_BASE_URL", server.url())
        .env("AMADEUS_QPS", "100")
        .stdout(Stdio::piped())
        .stdin(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()?;

    let mut stdout = BufReader::new(child.stdout.take().expect("piped stdout"));
    let mut stdin = child.stdin.take().expect("piped stdin");

    send(
        &mut stdin,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            }
        }),
    )
    .await?;
    let init = receive(&mut stdout).await?;
    assert_eq!(init["id"], 1);
    assert!(init["result"]["capabilities"]["tools"].is_object(), "{init}");
    send(
        &mut stdin,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await?;

    send(&mut stdin, json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"})).await?;
    let listed = receive(&mut stdout).await?;
    let tools = listed["result"]["tools"].as_array().cloned().unwrap_or_default();
    assert_eq!(tools.len(), 32, "{listed}");
    let city_tool = tools
        .iter()
        .find(|t| t["name"] == "city_search")
        .expect("city_search tool");
    let input_schema = &city_tool["inputSchema"];
    validate_json_schema(&json!({"keyword": "Dub"}), input_schema, "city_search input")?;
    assert!(
        validate_json_schema(&json!({"max_results": 3}), input_schema, "city_search input").is_err(),
        "keyword is required"
    );

    send(
        &mut stdin,
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "city_search", "arguments": {"keyword": "Dub"}}
        }),
    )
    .await?;
    let called = receive(&mut stdout).await?;
    let text = called["result"]["content"][0]["text"].as_str().unwrap_or_default();
    let records: Value = serde_json::from_str(text)?;
    let schema = load_schema_from_file("city-search-response.json")?;
    validate_json_schema(&records, &schema, "city-search-response.json")?;
    assert_eq!(records[0]["city_code"], "DXB");
    assert_eq!(records[0]["nearest_airport"], Value::Null);

    drop(stdin);
    drop(child);
    token.assert_async().await;
    cities.assert_async().await;

    Ok(())
}
