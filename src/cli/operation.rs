// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target selection and the query/mutation flags.

use clap::Args;
use std::path::PathBuf;

use crate::engine::mutation::MutationOp;
use crate::engine::query::QueryMode;

/// Which file and which entry to operate on.
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// Env file to read. Defaults to the first of .env, .env.local,
    /// .env.development and .env.production that exists.
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Key used by --has, --add and --rm.
    #[arg(short = 'e', long = "env", value_name = "KEY")]
    pub env: Option<String>,

    /// Value used by --is, --add and --rm.
    #[arg(long = "value", value_name = "VALUE")]
    pub value: Option<String>,

    /// Treat the file as production regardless of its name.
    #[arg(long)]
    pub prod: bool,
}

/// What to do with the file.
#[derive(Debug, Clone, Default, Args)]
pub struct OperationArgs {
    /// Add --env=--value unless the key already exists.
    #[arg(long, conflicts_with = "rm")]
    pub add: bool,

    /// Remove lines whose key matches --env or whose value matches --value.
    #[arg(long)]
    pub rm: bool,

    /// Exit 0 when --env exists.
    #[arg(long, group = "query")]
    pub has: bool,

    /// Exit 0 when some value equals --value.
    #[arg(long, group = "query")]
    pub is: bool,

    /// Invert the --has/--is answer.
    #[arg(long = "not", requires = "query")]
    pub negate: bool,

    /// Write changes and exports to disk.
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Create the env file empty when it does not exist.
    #[arg(long)]
    pub init: bool,

    /// Print YES/NO answers and the resulting file.
    #[arg(short = 'p', long)]
    pub print: bool,

    /// Remove every exported sibling (.json, .yaml, .toml, .xml, .ini).
    #[arg(long = "clean-all")]
    pub clean_all: bool,
}

impl OperationArgs {
    #[must_use]
    pub const fn query_mode(&self) -> Option<QueryMode> {
        if self.has {
            Some(QueryMode::Has)
        } else if self.is {
            Some(QueryMode::Is)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn mutation(&self) -> Option<MutationOp> {
        if self.add {
            Some(MutationOp::Add)
        } else if self.rm {
            Some(MutationOp::Remove)
        } else {
            None
        }
    }
}
