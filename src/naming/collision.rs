// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Collision-free target name resolution
//!
//! Guarantees that every proposed name in a batch is unique within its
//! target directory before any rename is committed. Collision checks for
//! files destined for the same directory must be serialized: one file's
//! chosen name changes what counts as existing for the next. A resolver
//! instance owns that per-batch state.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Outcome of resolving one proposed filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The final, non-colliding filename.
    pub name: String,
    /// The uniqueness suffix that was appended, e.g. `_1`, if any.
    pub suffix: Option<String>,
}

/// Resolves proposed filenames against one target directory.
///
/// Names claimed by earlier files in the same batch count as taken even
/// though those files have not been renamed yet.
pub struct CollisionResolver {
    dir: PathBuf,
    claimed: HashSet<String>,
}

impl CollisionResolver {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            claimed: HashSet::new(),
        }
    }

    /// Find the first non-colliding variant of `proposed` for the file
    /// currently at `own_path`.
    ///
    /// Candidates are probed in the order `base.ext`, `base_1.ext`,
    /// `base_2.ext`, … and the first free one wins. A directory entry that
    /// is the file's own current path does not count as a collision, so
    /// renaming a file onto its existing name is a no-op.
    pub fn resolve(&mut self, proposed: &str, own_path: &Path) -> Resolution {
        let (base, extension) = split_name(proposed);

        let mut candidate = proposed.to_string();
        let mut suffix = None;
        let mut count = 0u64;

        while self.taken(&candidate, own_path) {
            count += 1;
            let next = format!("_{}", count);
            candidate = format!("{}{}{}", base, next, extension);
            suffix = Some(next);
        }

        self.claimed.insert(candidate.clone());
        Resolution {
            name: candidate,
            suffix,
        }
    }

    fn taken(&self, candidate: &str, own_path: &Path) -> bool {
        if self.claimed.contains(candidate) {
            return true;
        }
        let candidate_path = self.dir.join(candidate);
        candidate_path.exists() && candidate_path != own_path
    }
}

/// Split a filename into base and extension, keeping the dot with the
/// extension. Dotfiles have no extension.
fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if i > 0 => name.split_at(i),
        _ => (name, ""),
    }
}
