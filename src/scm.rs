// src/scm.rs

//! Source control operations
//!
//! Two halves of the same contract: `capture_pin` records where a recipe's
//! repository lives and which commit is checked out, and `clone_at_pin`
//! reproduces exactly that tree later. Checkouts are always detached since
//! a pin names a commit, never a branch.

use crate::error::{Error, Result};
use crate::pins::SourcePin;
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::Repository;
use std::path::Path;
use tracing::{debug, info};

/// Record the clone url and HEAD commit of the repository containing
/// `recipe_dir`.
///
/// The url is taken from the `origin` remote. Fails if the folder is not
/// inside a git work tree or the repository has no usable `origin`.
pub fn capture_pin(recipe_dir: &Path) -> Result<SourcePin> {
    let repo = Repository::discover(recipe_dir).map_err(|_| Error::Provenance {
        path: recipe_dir.to_path_buf(),
        reason: "not inside a git work tree".to_string(),
    })?;

    let commit = repo.head()?.peel_to_commit()?.id().to_string();

    let remote = repo.find_remote("origin").map_err(|_| Error::Provenance {
        path: recipe_dir.to_path_buf(),
        reason: "no `origin` remote to record".to_string(),
    })?;
    let url = remote
        .url()
        .ok_or_else(|| Error::Provenance {
            path: recipe_dir.to_path_buf(),
            reason: "`origin` remote url is not valid utf-8".to_string(),
        })?
        .to_string();

    debug!("captured pin {} at {}", url, commit);
    Ok(SourcePin { url, commit })
}

/// Clone the pinned repository into `dest` and check out the pinned commit.
///
/// Any existing tree at `dest` is removed first so a rerun never sees stale
/// files from an earlier checkout.
pub fn clone_at_pin(pin: &SourcePin, dest: &Path) -> Result<()> {
    if dest.exists() {
        debug!("removing stale source tree at {}", dest.display());
        std::fs::remove_dir_all(dest)?;
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("cloning {} into {}", pin.url, dest.display());
    let repo = RepoBuilder::new().clone(&pin.url, dest)?;
    checkout_detached(&repo, &pin.commit)
}

fn checkout_detached(repo: &Repository, commit: &str) -> Result<()> {
    let (object, _reference) = repo.revparse_ext(commit)?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_tree(&object, Some(&mut checkout))?;

    // A pin is a commit, not a ref, so HEAD always ends up detached
    repo.set_head_detached(object.id())?;
    Ok(())
}
