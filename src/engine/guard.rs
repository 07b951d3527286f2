// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Production write protection.
//!
//! ```text
//! production = path contains ".env.production" || --prod
//! protected  = production && guard.never_write_production (default true)
//! ```

use std::path::Path;

use tracing::error;

use crate::config::types::GuardSettings;
use crate::error::{EnvError, EnvResult};

/// Marker that identifies a production env file by name.
pub const PRODUCTION_MARKER: &str = ".env.production";

/// Consulted before every disk write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionGuard {
    production: bool,
    protected: bool,
}

impl ProductionGuard {
    #[must_use]
    pub fn detect(path: &Path, forced: bool, settings: &GuardSettings) -> Self {
        let production = forced || path.to_string_lossy().contains(PRODUCTION_MARKER);
        let protected = production && settings.never_write_production.unwrap_or(true);
        Self {
            production,
            protected,
        }
    }

    #[must_use]
    pub const fn is_production(&self) -> bool {
        self.production
    }

    #[must_use]
    pub const fn is_protected(&self) -> bool {
        self.protected
    }

    /// Refuses the write to `target` while protection is active.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::ProductionProtected`.
    pub fn check(&self, target: &Path) -> EnvResult<()> {
        if self.protected {
            error!(path = %target.display(), "refusing to write to a production env file");
            return Err(EnvError::ProductionProtected {
                path: target.to_path_buf(),
            });
        }
        Ok(())
    }
}
