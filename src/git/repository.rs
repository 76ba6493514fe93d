use std::path::Path;

use git2::Repository;

use crate::error::{Result, TagflowError};
use crate::git::GitAccess;

/// Real [GitAccess] implementation backed by the `git2` crate.
pub struct Git2Repository {
    repo: Repository,
}

impl Git2Repository {
    /// Opens the repository containing `path` (walks up parent directories).
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(Git2Repository { repo })
    }

    /// Builds the credential callbacks used for push.
    ///
    /// Tries SSH keys from ~/.ssh/ in order of preference, then the SSH
    /// agent, then default credentials.
    fn credential_callbacks() -> git2::RemoteCallbacks<'static> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });
        callbacks
    }
}

impl GitAccess for Git2Repository {
    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        head.shorthand()
            .map(|s| s.to_string())
            .ok_or_else(|| TagflowError::input("HEAD is detached or not valid UTF-8"))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let names = self.repo.tag_names(None)?;
        Ok(names.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn create_tag(&self, tag_name: &str, message: &str) -> Result<()> {
        // Conditional create: a concurrent invocation may have taken this
        // name since the tag list was read.
        let ref_name = format!("refs/tags/{}", tag_name);
        if self.repo.find_reference(&ref_name).is_ok() {
            return Err(TagflowError::TagConflict {
                tag: tag_name.to_string(),
            });
        }

        let head = self.repo.head()?.peel_to_commit()?;
        let tagger = self.repo.signature()?;
        self.repo
            .tag(tag_name, head.as_object(), &tagger, message, false)?;
        Ok(())
    }

    fn push_tag(&self, remote_name: &str, tag_name: &str) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            TagflowError::input(format!("no remote named '{}' found", remote_name))
        })?;

        let mut callbacks = Self::credential_callbacks();

        // Catch per-reference rejections during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote.push(
            &[&format!("refs/tags/{}", tag_name)],
            Some(&mut push_options),
        )?;
        Ok(())
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send + Sync.
// git2 library is thread-safe for read operations via libgit2's thread-safe design.
unsafe impl Sync for Git2Repository {}
