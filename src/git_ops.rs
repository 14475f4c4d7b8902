use git2::{Repository, StatusOptions};

use crate::error::{Result, VbumpError};

/// Wrapper around git2 Repository for the tagging step.
///
/// Only local operations are exposed: repository discovery, a working-tree
/// cleanliness check, and lightweight tag creation. Nothing here touches a
/// remote.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the git repository enclosing the current directory.
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(GitRepo { repo })
    }

    /// Returns true if the working tree has uncommitted changes.
    ///
    /// Untracked files are ignored; only tracked modifications count.
    pub fn is_dirty(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    /// Returns true if a tag with the given name already exists.
    pub fn tag_exists(&self, tag_name: &str) -> Result<bool> {
        let tags = self.repo.tag_names(Some(tag_name))?;
        Ok(tags.iter().flatten().any(|name| name == tag_name))
    }

    /// Creates a lightweight tag on the current HEAD commit.
    pub fn create_tag(&self, tag_name: &str) -> Result<()> {
        if self.tag_exists(tag_name)? {
            return Err(VbumpError::config(format!(
                "tag '{tag_name}' already exists"
            )));
        }
        let head = self.repo.head()?.peel_to_commit()?;
        self.repo.tag_lightweight(tag_name, head.as_object(), false)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn init_repo_with_commit(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        {
            let sig = git2::Signature::now("test", "test@example.com").unwrap();
            let tree_id = {
                let mut index = repo.index().unwrap();
                index.write_tree().unwrap()
            };
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
                .unwrap();
        }
        repo
    }

    #[test]
    fn test_create_and_detect_tag() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        let repo = GitRepo {
            repo: Repository::open(dir.path()).unwrap(),
        };
        assert!(!repo.tag_exists("v1.0.0").unwrap());
        repo.create_tag("v1.0.0").unwrap();
        assert!(repo.tag_exists("v1.0.0").unwrap());
    }

    #[test]
    fn test_duplicate_tag_fails() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        let repo = GitRepo {
            repo: Repository::open(dir.path()).unwrap(),
        };
        repo.create_tag("v1.0.0").unwrap();
        let err = repo.create_tag("v1.0.0").unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_clean_tree_is_not_dirty() {
        let dir = tempfile::tempdir().unwrap();
        init_repo_with_commit(dir.path());

        let repo = GitRepo {
            repo: Repository::open(dir.path()).unwrap(),
        };
        assert!(!repo.is_dirty().unwrap());
    }
}
