use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use crate::{
    domain::credential::Credential,
    infra::{contracts::CredentialStore, error::AppError},
};

const CREDENTIALS_CORRUPT: &str = "CREDENTIALS_CORRUPT";
const CREDENTIALS_UNREADABLE: &str = "CREDENTIALS_UNREADABLE";

/// Credential store mirrored to a JSON file so the session survives restarts.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cached: Mutex<Option<Credential>>,
}

impl FileCredentialStore {
    /// Opens the store at `path`. A missing, unreadable or corrupt file
    /// yields an empty store.
    pub fn open(path: PathBuf) -> Self {
        let cached = read_credential(&path);
        Self {
            path,
            cached: Mutex::new(cached),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, credential: Credential) -> Result<(), AppError> {
        let encoded = serde_json::to_vec_pretty(&credential).map_err(AppError::CredentialEncode)?;
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        write_atomically(&self.path, &encoded)?;
        *cached = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
        remove_if_exists(&self.path).map(|_| ())
    }
}

/// Process-local store without persistence.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    cached: Mutex<Option<Credential>>,
}

#[cfg(test)]
impl InMemoryCredentialStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            cached: Mutex::new(Some(credential)),
        }
    }
}

#[cfg(test)]
impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Option<Credential> {
        self.cached
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, credential: Credential) -> Result<(), AppError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = Some(credential);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        *cached = None;
        Ok(())
    }
}

/// Removes `path`, reporting whether a file was actually there.
pub fn remove_if_exists(path: &Path) -> Result<bool, AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(source) if source.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(AppError::CredentialRemove {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_credential(path: &Path) -> Option<Credential> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == ErrorKind::NotFound => return None,
        Err(source) => {
            tracing::warn!(
                code = CREDENTIALS_UNREADABLE,
                path = %path.display(),
                error = %source,
                "stored credentials could not be read; starting anonymous"
            );
            return None;
        }
    };

    match serde_json::from_slice::<Credential>(&raw) {
        Ok(credential) if !credential.access_token.is_empty() => Some(credential),
        Ok(_) | Err(_) => {
            tracing::warn!(
                code = CREDENTIALS_CORRUPT,
                path = %path.display(),
                "stored credentials are malformed; starting anonymous"
            );
            None
        }
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let map_write = |source| AppError::CredentialWrite {
        path: path.to_path_buf(),
        source,
    };

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents).map_err(map_write)?;
    restrict_permissions(&tmp_path).map_err(map_write)?;
    fs::rename(&tmp_path, path).map_err(map_write)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
