//! Session cookie settings.
//!
//! The cookie is encrypted and signed with a key read from a file. Debug
//! builds, or deployments that opt in, fall back to a random per-process key,
//! which logs every user out on restart.

use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Minimum key file length accepted.
pub const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a key file unless ephemeral keys are allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    /// ```
    /// use rideshare::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Inputs for [`session_settings`].
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub key_file: PathBuf,
    pub allow_ephemeral: bool,
    pub cookie_secure: bool,
}

/// Settings applied to the session middleware.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while loading session settings.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Resolve the session key and cookie flags.
///
/// Release builds without an ephemeral opt-in fail on an unreadable or short
/// key file; otherwise those cases log a warning and use a random key.
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let fallback_allowed = mode.is_debug() || options.allow_ephemeral;
    let key = match load_key(&options.key_file) {
        Ok(key) => key,
        Err(error) if fallback_allowed => {
            warn!(error = %error, "using temporary session key; sessions end on restart");
            Key::generate()
        }
        Err(error) => return Err(error),
    };
    if !options.cookie_secure {
        warn!("session cookie is not marked Secure");
    }
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
        same_site: SameSite::Lax,
    })
}

fn load_key(path: &Path) -> Result<Key, SessionConfigError> {
    let mut bytes = std::fs::read(path).map_err(|source| SessionConfigError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    let length = bytes.len();
    if length < SESSION_KEY_MIN_LEN {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path: path.to_path_buf(),
            length,
            min_len: SESSION_KEY_MIN_LEN,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}
