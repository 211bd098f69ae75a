use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of auth activity. Every event carries the id of the
/// CLI invocation that produced it.
pub struct AuditLog {
    pub path: PathBuf,
    invocation_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    invocation_id: &'a str,
    backend: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl AuditLog {
    pub fn new(path: &Path, invocation_id: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            invocation_id: invocation_id.to_string(),
            file,
        })
    }

    fn log(&mut self, backend: &str, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            invocation_id: &self.invocation_id,
            backend,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_restored(&mut self, backend: &str, email: &str) -> Result<()> {
        self.log(backend, "session_restored", serde_json::json!({ "email": email }))
    }

    pub fn login_ok(&mut self, backend: &str, email: &str) -> Result<()> {
        self.log(backend, "login_ok", serde_json::json!({ "email": email }))
    }

    pub fn login_failed(&mut self, backend: &str, email: &str, reason: &str) -> Result<()> {
        self.log(
            backend,
            "login_failed",
            serde_json::json!({ "email": email, "reason": reason }),
        )
    }

    pub fn signup_ok(&mut self, backend: &str, email: &str, signed_in: bool) -> Result<()> {
        self.log(
            backend,
            "signup_ok",
            serde_json::json!({ "email": email, "signed_in": signed_in }),
        )
    }

    pub fn signup_failed(&mut self, backend: &str, email: &str, reason: &str) -> Result<()> {
        self.log(
            backend,
            "signup_failed",
            serde_json::json!({ "email": email, "reason": reason }),
        )
    }

    pub fn logout(&mut self, backend: &str) -> Result<()> {
        self.log(backend, "logout", serde_json::json!({}))
    }

    pub fn profile_updated(&mut self, backend: &str, fields: &[&str]) -> Result<()> {
        self.log(
            backend,
            "profile_updated",
            serde_json::json!({ "fields": fields }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut log = AuditLog::new(&path, "inv-1").unwrap();
        log.login_ok("mock", "a@x.com").unwrap();
        log.login_failed("mock", "b@x.com", "invalid email or password")
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "login_ok");
        assert_eq!(first["email"], "a@x.com");
        assert_eq!(first["invocation_id"], "inv-1");
        assert_eq!(first["backend"], "mock");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "login_failed");
        assert_eq!(second["reason"], "invalid email or password");
    }

    #[test]
    fn test_log_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        {
            let mut log = AuditLog::new(&path, "inv-1").unwrap();
            log.logout("mock").unwrap();
        }
        {
            let mut log = AuditLog::new(&path, "inv-2").unwrap();
            log.logout("mock").unwrap();
        }
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
