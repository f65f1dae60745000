use std::fs;
use std::io::{self, Write};
use std::path::Path;

use gigboard_core::User;
use gigboard_engine::AuthSession;
use gigboard_logging::{board_error, board_info, board_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const SESSION_FILENAME: &str = ".gigboard_session.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedSession {
    access_token: String,
    refresh_token: Option<String>,
    user_id: String,
    email: Option<String>,
}

impl From<&AuthSession> for PersistedSession {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            user_id: session.user.id.clone(),
            email: session.user.email.clone(),
        }
    }
}

impl From<PersistedSession> for AuthSession {
    fn from(saved: PersistedSession) -> Self {
        AuthSession {
            access_token: saved.access_token,
            refresh_token: saved.refresh_token,
            user: User {
                id: saved.user_id,
                email: saved.email,
            },
        }
    }
}

/// Reads the session left by a previous run. Unreadable files are ignored.
pub(crate) fn load_session(dir: &Path) -> Option<AuthSession> {
    let path = dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            board_warn!("Failed to read saved session from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<PersistedSession>(&content) {
        Ok(saved) => {
            board_info!("Loaded saved session from {:?}", path);
            Some(saved.into())
        }
        Err(err) => {
            board_warn!("Failed to parse saved session from {:?}: {}", path, err);
            None
        }
    }
}

/// Writes the session, or removes the file when there is none.
pub(crate) fn save_session(dir: &Path, session: Option<&AuthSession>) {
    let path = dir.join(SESSION_FILENAME);
    let Some(session) = session else {
        match fs::remove_file(&path) {
            Ok(()) => board_info!("Removed saved session {:?}", path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => board_warn!("Failed to remove saved session {:?}: {}", path, err),
        }
        return;
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&PersistedSession::from(session), pretty) {
        Ok(text) => text,
        Err(err) => {
            board_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    if let Err(err) = write_atomic(dir, &path, &content) {
        board_error!("Failed to write session to {:?}: {}", path, err);
    }
}

/// Writes a temp file in `dir` then renames it over `target`.
fn write_atomic(dir: &Path, target: &Path, content: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use gigboard_core::User;
    use gigboard_engine::AuthSession;
    use tempfile::TempDir;

    use super::{load_session, save_session, SESSION_FILENAME};

    fn session() -> AuthSession {
        AuthSession {
            access_token: "access".to_string(),
            refresh_token: Some("refresh".to_string()),
            user: User {
                id: "user-1".to_string(),
                email: Some("a@b.c".to_string()),
            },
        }
    }

    #[test]
    fn saved_session_is_loaded_back() {
        let dir = TempDir::new().unwrap();
        save_session(dir.path(), Some(&session()));
        assert_eq!(load_session(dir.path()), Some(session()));
    }

    #[test]
    fn saving_none_removes_the_file() {
        let dir = TempDir::new().unwrap();
        save_session(dir.path(), Some(&session()));
        save_session(dir.path(), None);
        assert!(!dir.path().join(SESSION_FILENAME).exists());
        assert_eq!(load_session(dir.path()), None);
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SESSION_FILENAME), "not ron at all (").unwrap();
        assert_eq!(load_session(dir.path()), None);
    }
}
