//! Flat-file user store: one JSON array holding every `UserRecord`.
//!
//! Every read-modify-write runs under a single writer mutex, so concurrent
//! signups and progress updates cannot lose each other's changes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

pub const SEED_EMAIL: &str = "test@test.com";
pub const SEED_PASSWORD: &str = "password";

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email and password are required")]
    MissingFields,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed user store: {0}")]
    Corrupt(String),
}

/// Passwords are stored and compared as plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub password: String,
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The part of a user that is safe to send back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub email: String,
    pub uid: String,
}

impl From<&UserRecord> for PublicUser {
    fn from(record: &UserRecord) -> Self {
        Self {
            email: record.email.clone(),
            uid: record.uid.clone(),
        }
    }
}

/// Returned for users that have never saved progress.
pub fn default_progress() -> Value {
    json!({
        "questionsSolved": 0,
        "mockInterviews": 0,
        "timeSpent": 0,
        "recentActivity": []
    })
}

pub fn find_by_email<'a>(records: &'a [UserRecord], email: &str) -> Option<&'a UserRecord> {
    let email = email.to_lowercase();
    records.iter().find(|r| r.email.to_lowercase() == email)
}

pub fn find_by_uid<'a>(records: &'a [UserRecord], uid: &str) -> Option<&'a UserRecord> {
    records.iter().find(|r| r.uid == uid)
}

pub struct UserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl UserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_all(&self) -> Result<Vec<UserRecord>, UserError> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    pub async fn save_all(&self, records: &[UserRecord]) -> Result<(), UserError> {
        let _guard = self.lock.lock().await;
        self.write_records(records).await
    }

    pub async fn signup(&self, email: &str, password: &str) -> Result<PublicUser, UserError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UserError::MissingFields);
        }

        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        if find_by_email(&records, email).is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let record = UserRecord {
            email: email.to_string(),
            password: password.to_string(),
            uid: new_uid(records.len() + 1),
            progress: None,
            created_at: Some(Utc::now()),
        };
        let user = PublicUser::from(&record);
        records.push(record);
        self.write_records(&records).await?;

        info!("Created user {}", user.uid);
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, UserError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UserError::MissingFields);
        }

        let records = self.load_all().await?;
        match find_by_email(&records, email) {
            Some(record) if record.password == password => Ok(PublicUser::from(record)),
            _ => Err(UserError::InvalidCredentials),
        }
    }

    pub async fn progress(&self, uid: &str) -> Result<Value, UserError> {
        let records = self.load_all().await?;
        let record = find_by_uid(&records, uid).ok_or(UserError::NotFound)?;
        Ok(record.progress.clone().unwrap_or_else(default_progress))
    }

    pub async fn update_progress(&self, uid: &str, progress: Value) -> Result<Value, UserError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        let record = records
            .iter_mut()
            .find(|r| r.uid == uid)
            .ok_or(UserError::NotFound)?;
        record.progress = Some(progress.clone());
        self.write_records(&records).await?;
        Ok(progress)
    }

    /// Caller must hold `lock`. Creates the seed user when the file does not exist yet.
    async fn read_records(&self) -> Result<Vec<UserRecord>, UserError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "User store {} not found; seeding default user",
                    self.path.display()
                );
                let seed = vec![seed_record()];
                self.write_records(&seed).await?;
                return Ok(seed);
            }
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|e| UserError::Corrupt(e.to_string()))
    }

    /// Caller must hold `lock`. Writes a sibling temp file, then renames it over the store.
    async fn write_records(&self, records: &[UserRecord]) -> Result<(), UserError> {
        let body =
            serde_json::to_string_pretty(records).map_err(|e| UserError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

fn seed_record() -> UserRecord {
    UserRecord {
        email: SEED_EMAIL.to_string(),
        password: SEED_PASSWORD.to_string(),
        uid: new_uid(1),
        progress: None,
        created_at: Some(Utc::now()),
    }
}

/// `user-<n>-<8 hex chars>`
fn new_uid(ordinal: usize) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("user-{ordinal}-{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn store_in(dir: &tempfile::TempDir) -> UserStore {
        UserStore::new(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_seeded_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let records = store.load_all().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, SEED_EMAIL);
        assert!(store.path().exists());
        assert_eq!(store.load_all().await.unwrap(), records);
    }

    #[tokio::test]
    async fn test_signup_then_login_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let created = store.signup("a@b.com", "x").await.unwrap();
        assert!(created.uid.starts_with("user-2-"));
        assert_eq!(created.uid.len(), "user-2-".len() + 8);

        let logged_in = store.login("A@B.com", "x").await.unwrap();
        assert_eq!(logged_in, created);

        assert!(matches!(
            store.login("a@b.com", "X").await,
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            store.login("nobody@b.com", "x").await,
            Err(UserError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_and_missing_fields_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.signup("a@b.com", "x").await.unwrap();
        assert!(matches!(
            store.signup("A@b.COM", "y").await,
            Err(UserError::DuplicateEmail)
        ));
        assert!(matches!(
            store.signup("", "y").await,
            Err(UserError::MissingFields)
        ));
        assert!(matches!(
            store.signup("c@d.com", "").await,
            Err(UserError::MissingFields)
        ));
    }

    #[tokio::test]
    async fn test_progress_defaults_and_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let user = store.signup("a@b.com", "x").await.unwrap();

        assert_eq!(store.progress(&user.uid).await.unwrap(), default_progress());

        let progress = json!({"questionsSolved": 4, "recentActivity": ["aptitude"]});
        let echoed = store.update_progress(&user.uid, progress.clone()).await.unwrap();
        assert_eq!(echoed, progress);
        assert_eq!(store.progress(&user.uid).await.unwrap(), progress);

        assert!(matches!(
            store.progress("user-404").await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(
            store.update_progress("user-404", json!({})).await,
            Err(UserError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.load_all().await, Err(UserError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_legacy_records_without_optional_fields_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"[{"email": "old@x.com", "password": "pw", "uid": "user-1-deadbeef"}]"#,
        )
        .unwrap();

        let records = store.load_all().await.unwrap();
        assert_eq!(records[0].progress, None);
        assert_eq!(records[0].created_at, None);

        store.save_all(&records).await.unwrap();
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(!written.contains("createdAt"));
    }

    #[tokio::test]
    async fn test_concurrent_signups_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.signup(&format!("u{i}@x.com"), "pw").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = store.load_all().await.unwrap();
        assert_eq!(records.len(), 11);
        assert!(find_by_email(&records, "U7@X.COM").is_some());
    }

    #[test]
    fn test_find_helpers() {
        let records = vec![UserRecord {
            email: "Mixed@Case.com".to_string(),
            password: "pw".to_string(),
            uid: "user-1-abc".to_string(),
            progress: None,
            created_at: None,
        }];
        assert!(find_by_email(&records, "mixed@case.com").is_some());
        assert!(find_by_uid(&records, "user-1-abc").is_some());
        assert!(find_by_uid(&records, "USER-1-ABC").is_none());
    }
}
