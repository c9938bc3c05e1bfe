//! Signed-in user, stored as session.json in the app data directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of the current user's identity
pub trait AuthProvider {
    fn user_id(&self) -> Option<&str>;
    fn sign_in(&mut self, user_id: &str);
    fn sign_out(&mut self);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    user_id: Option<String>,
}

pub struct LocalSession {
    path: PathBuf,
    user_id: Option<String>,
}

impl LocalSession {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("session.json");
        let user_id = match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str::<SessionFile>(&s) {
                Ok(file) => file.user_id.filter(|id| !id.trim().is_empty()),
                Err(e) => {
                    warn!(error = %e, "Failed to parse session, treating as signed out");
                    None
                }
            },
            Err(_) => {
                debug!("No session file found");
                None
            }
        };
        Self { path, user_id }
    }

    fn save(&self) {
        let file = SessionFile {
            user_id: self.user_id.clone(),
        };
        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    warn!(error = %e, "Failed to save session");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }
}

impl AuthProvider for LocalSession {
    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn sign_in(&mut self, user_id: &str) {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return;
        }
        info!(user_id, "Signed in");
        self.user_id = Some(user_id.to_string());
        self.save();
    }

    fn sign_out(&mut self) {
        info!("Signed out");
        self.user_id = None;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(error = %e, "Failed to remove session file");
            }
        }
    }
}
