//! Process responder — shells out to the `goose` reasoning executable.
//!
//! The executable is treated as an opaque collaborator: it receives the
//! assembled prompt plus optional provider/model/system-prompt flags and
//! prints a JSON document (sometimes preceded by banner noise) from which the
//! last assistant text block is extracted. Every failure mode — missing
//! executable, spawn failure, non-zero exit, timeout, unparsable output,
//! absent assistant content — maps to a distinct [`ResponderError`] variant.

use async_trait::async_trait;
use ember_core::error::ResponderError;
use ember_core::responder::{Responder, ResponderRequest};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, warn};

/// Environment variable overriding executable discovery.
pub const RESPONDER_EXE_ENV: &str = "EMBER_RESPONDER_EXE";

const DEFAULT_EXECUTABLE: &str = "goose";

/// Reasoning collaborator backed by an external executable.
pub struct ProcessResponder {
    /// Configured executable path (overrides PATH discovery)
    executable: Option<String>,
}

impl ProcessResponder {
    pub fn new(executable: Option<String>) -> Self {
        Self { executable }
    }

    /// Find the reasoning executable.
    ///
    /// Priority:
    /// 1. `EMBER_RESPONDER_EXE` environment variable
    /// 2. configured path
    /// 3. `goose` on PATH
    /// 4. `~/.local/bin/goose`
    fn locate(&self) -> Result<PathBuf, ResponderError> {
        if let Ok(explicit) = std::env::var(RESPONDER_EXE_ENV) {
            let path = PathBuf::from(&explicit);
            if path.is_file() {
                return Ok(path);
            }
            return Err(ResponderError::NotFound(format!(
                "{RESPONDER_EXE_ENV} points at {explicit}, which does not exist"
            )));
        }

        if let Some(configured) = &self.executable {
            let path = PathBuf::from(configured);
            if path.is_file() {
                return Ok(path);
            }
            return Err(ResponderError::NotFound(format!(
                "configured responder executable {configured} does not exist"
            )));
        }

        if let Some(found) = find_on_path(DEFAULT_EXECUTABLE) {
            return Ok(found);
        }

        let fallback = home_dir()
            .join(".local")
            .join("bin")
            .join(DEFAULT_EXECUTABLE);
        if fallback.is_file() {
            return Ok(fallback);
        }

        Err(ResponderError::NotFound(format!(
            "could not find the {DEFAULT_EXECUTABLE} executable; install it, \
             set responder.executable in config.toml, or set {RESPONDER_EXE_ENV}"
        )))
    }

    /// Assemble the command-line arguments for one request.
    fn build_args(request: &ResponderRequest) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "run".into(),
            "--no-session".into(),
            "--output-format".into(),
            "json".into(),
        ];

        if let Some(provider) = &request.provider {
            args.push("--provider".into());
            args.push(provider.clone());
        }
        if let Some(model) = &request.model {
            args.push("--model".into());
            args.push(model.clone());
        }
        if let Some(system_prompt) = &request.system_prompt {
            args.push("--system".into());
            args.push(system_prompt.clone());
        }

        args.push("-t".into());
        args.push(request.prompt.clone());
        args
    }
}

#[async_trait]
impl Responder for ProcessResponder {
    fn name(&self) -> &str {
        "goose"
    }

    async fn respond(
        &self,
        request: ResponderRequest,
    ) -> std::result::Result<String, ResponderError> {
        let executable = self.locate()?;
        let args = Self::build_args(&request);
        let timeout_secs = request.timeout.as_secs();

        debug!(executable = %executable.display(), "Dispatching to responder");

        let invocation = Command::new(&executable)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(request.timeout, invocation)
            .await
            .map_err(|_| ResponderError::Timeout { timeout_secs })?
            .map_err(|e| ResponderError::Spawn(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            warn!(exit_code = code, "Responder exited with failure");
            let detail = if !stderr.is_empty() {
                stderr
            } else if !stdout.is_empty() {
                stdout
            } else {
                format!("exit code {code}")
            };
            return Err(ResponderError::NonZeroExit { code, detail });
        }

        // Some versions print their output on stderr
        let raw = if stdout.is_empty() && !stderr.is_empty() {
            stderr
        } else {
            stdout
        };

        extract_reply(&raw)
    }
}

/// Pull the last assistant text block out of the responder's JSON output.
///
/// The document may be preceded by banner noise, so parsing starts at the
/// first `{`. Messages are scanned newest-first for an assistant entry with
/// a non-empty text content part.
fn extract_reply(raw: &str) -> Result<String, ResponderError> {
    let json_start = raw
        .find('{')
        .ok_or_else(|| ResponderError::MalformedOutput(preview(raw)))?;

    let payload: serde_json::Value = serde_json::from_str(&raw[json_start..])
        .map_err(|e| ResponderError::MalformedOutput(format!("{e} in: {}", preview(raw))))?;

    let messages = payload["messages"].as_array();
    for message in messages.into_iter().flatten().rev() {
        if message["role"].as_str() != Some("assistant") {
            continue;
        }
        for part in message["content"].as_array().into_iter().flatten() {
            if part["type"].as_str() != Some("text") {
                continue;
            }
            let text = part["text"].as_str().unwrap_or("").trim();
            if !text.is_empty() {
                return Ok(text.to_string());
            }
        }
    }

    Err(ResponderError::NoAssistantContent)
}

/// First 200 chars of the raw output, for error detail.
fn preview(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "empty output".into();
    }
    trimmed.chars().take(200).collect()
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        #[cfg(target_os = "windows")]
        {
            let exe = dir.join(format!("{name}.exe"));
            if exe.is_file() {
                return Some(exe);
            }
        }
    }
    None
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(prompt: &str) -> ResponderRequest {
        ResponderRequest::new(prompt, Duration::from_secs(30))
    }

    #[test]
    fn args_without_optional_parameters() {
        let args = ProcessResponder::build_args(&request("hello"));
        assert_eq!(
            args,
            vec!["run", "--no-session", "--output-format", "json", "-t", "hello"]
        );
    }

    #[test]
    fn args_with_all_parameters() {
        let mut req = request("hello");
        req.provider = Some("openrouter".into());
        req.model = Some("claude-sonnet".into());
        req.system_prompt = Some("You are terse.".into());

        let args = ProcessResponder::build_args(&req);
        let rendered = args.join(" ");
        assert!(rendered.contains("--provider openrouter"));
        assert!(rendered.contains("--model claude-sonnet"));
        assert!(rendered.contains("--system You are terse."));
        assert_eq!(args.last().unwrap(), "hello");
    }

    #[test]
    fn extracts_last_assistant_text() {
        let raw = r#"{"messages":[
            {"role":"user","content":[{"type":"text","text":"hi"}]},
            {"role":"assistant","content":[{"type":"text","text":"first"}]},
            {"role":"assistant","content":[{"type":"text","text":"second"}]}
        ]}"#;
        assert_eq!(extract_reply(raw).unwrap(), "second");
    }

    #[test]
    fn skips_banner_noise_before_json() {
        let raw = "starting goose v1.2\nloading extensions...\n{\"messages\":[{\"role\":\"assistant\",\"content\":[{\"type\":\"text\",\"text\":\"hello\"}]}]}";
        assert_eq!(extract_reply(raw).unwrap(), "hello");
    }

    #[test]
    fn skips_empty_and_non_text_parts() {
        let raw = r#"{"messages":[
            {"role":"assistant","content":[
                {"type":"toolRequest","id":"t1"},
                {"type":"text","text":"   "},
                {"type":"text","text":"the real reply"}
            ]}
        ]}"#;
        assert_eq!(extract_reply(raw).unwrap(), "the real reply");
    }

    #[test]
    fn output_without_json_is_malformed() {
        let err = extract_reply("no json here at all").unwrap_err();
        assert!(matches!(err, ResponderError::MalformedOutput(_)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = extract_reply("{not valid json").unwrap_err();
        assert!(matches!(err, ResponderError::MalformedOutput(_)));
    }

    #[test]
    fn missing_assistant_message_is_distinct_failure() {
        let raw = r#"{"messages":[{"role":"user","content":[{"type":"text","text":"hi"}]}]}"#;
        let err = extract_reply(raw).unwrap_err();
        assert!(matches!(err, ResponderError::NoAssistantContent));
    }

    #[test]
    fn nonexistent_configured_executable_not_found() {
        let responder = ProcessResponder::new(Some("/definitely/not/here/goose".into()));
        let err = responder.locate().unwrap_err();
        assert!(matches!(err, ResponderError::NotFound(_)));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn fake_responder(dir: &std::path::Path, script_body: &str) -> String {
            let path = dir.join("fake-goose");
            std::fs::write(&path, format!("#!/bin/sh\n{script_body}\n")).unwrap();
            let mut perms = std::fs::metadata(&path).unwrap().permissions();
            perms.set_mode(0o755);
            std::fs::set_permissions(&path, perms).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[tokio::test]
        async fn respond_returns_assistant_text() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_responder(
                dir.path(),
                r#"echo '{"messages":[{"role":"assistant","content":[{"type":"text","text":"scripted reply"}]}]}'"#,
            );

            let responder = ProcessResponder::new(Some(exe));
            let reply = responder.respond(request("hello")).await.unwrap();
            assert_eq!(reply, "scripted reply");
        }

        #[tokio::test]
        async fn non_zero_exit_carries_stderr_detail() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_responder(dir.path(), "echo 'provider unavailable' >&2\nexit 3");

            let responder = ProcessResponder::new(Some(exe));
            let err = responder.respond(request("hello")).await.unwrap_err();
            match err {
                ResponderError::NonZeroExit { code, detail } => {
                    assert_eq!(code, 3);
                    assert!(detail.contains("provider unavailable"));
                }
                other => panic!("expected NonZeroExit, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn slow_responder_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_responder(dir.path(), "sleep 5");

            let responder = ProcessResponder::new(Some(exe));
            let mut req = request("hello");
            req.timeout = Duration::from_millis(100);

            let err = responder.respond(req).await.unwrap_err();
            assert!(matches!(err, ResponderError::Timeout { .. }));
        }

        #[tokio::test]
        async fn stderr_output_used_when_stdout_empty() {
            let dir = tempfile::tempdir().unwrap();
            let exe = fake_responder(
                dir.path(),
                r#"echo '{"messages":[{"role":"assistant","content":[{"type":"text","text":"from stderr"}]}]}' >&2"#,
            );

            let responder = ProcessResponder::new(Some(exe));
            let reply = responder.respond(request("hello")).await.unwrap();
            assert_eq!(reply, "from stderr");
        }
    }
}
