use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use taplist_logging::{tap_info, tap_warn};
use thiserror::Error;
use uuid::Uuid;

use crate::persist::{AtomicFileWriter, PersistError};

/// File in the data directory holding the actor id.
pub const ACTOR_FILE_NAME: &str = ".taplist_actor";

const ACTOR_PREFIX: &str = "user_";
const ACTOR_SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("could not read actor file: {0}")]
    Read(#[from] io::Error),
    #[error("could not save actor file: {0}")]
    Write(#[from] PersistError),
}

/// Pseudonymous id stamped on every availability write from this client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorIdentity(String);

impl ActorIdentity {
    /// Fresh `user_xxxxxxxxx` id.
    pub fn generate() -> Self {
        let entropy = Uuid::new_v4().as_u128();
        let suffix: String = (0..ACTOR_SUFFIX_LEN)
            .scan(entropy, |rest, _| {
                let digit = (*rest % 36) as usize;
                *rest /= 36;
                Some(BASE36[digit] as char)
            })
            .collect();
        Self(format!("{ACTOR_PREFIX}{suffix}"))
    }

    /// Reads the id saved in `dir`, or generates and saves one. A file that
    /// does not hold a well-formed id is replaced.
    pub fn load_or_create(dir: &Path) -> Result<Self, IdentityError> {
        let path = dir.join(ACTOR_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                if let Some(existing) = Self::parse(&contents) {
                    return Ok(existing);
                }
                tap_warn!("Ignoring malformed actor file {}", path.display());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let fresh = Self::generate();
        AtomicFileWriter::new(dir.to_path_buf()).write(ACTOR_FILE_NAME, &format!("{fresh}\n"))?;
        tap_info!("Created actor identity {} in {}", fresh, path.display());
        Ok(fresh)
    }

    pub fn parse(text: &str) -> Option<Self> {
        let id = text.trim();
        let suffix = id.strip_prefix(ACTOR_PREFIX)?;
        let well_formed = suffix.len() == ACTOR_SUFFIX_LEN
            && suffix.bytes().all(|b| BASE36.contains(&b));
        well_formed.then(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed() {
        for _ in 0..50 {
            let id = ActorIdentity::generate();
            assert_eq!(ActorIdentity::parse(id.as_str()), Some(id.clone()));
            assert_eq!(id.as_str().len(), ACTOR_PREFIX.len() + ACTOR_SUFFIX_LEN);
        }
    }

    #[test]
    fn parse_rejects_foreign_text() {
        assert_eq!(ActorIdentity::parse("user_ABC"), None);
        assert_eq!(ActorIdentity::parse("admin_123456789"), None);
        assert!(ActorIdentity::parse(" user_0a1b2c3d4 \n").is_some());
    }
}
