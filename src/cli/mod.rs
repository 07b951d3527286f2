// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for envkit using clap derive.
//!
//! # Flag Groups
//!
//! ```text
//! envkit [global options] [target] [operation] [export]
//! global     --config --log-level --log-file -v
//! target     -f/--file -e/--env --value --prod
//! operation  --add|--rm  --has|--is  --not  -w --init -p --clean-all
//! export     --json --yaml --xml --toml --ini --mk-all
//! ```
//!
//! Flags only ever switch behaviour on. The `[defaults]` config section is
//! OR-ed over them when the engine options are resolved.

pub mod export;
pub mod global;
pub mod operation;


use crate::cli::export::ExportArgs;
use crate::cli::global::GlobalOptions;
use crate::cli::operation::{OperationArgs, TargetArgs};
use crate::config::types::FlagDefaults;
use crate::engine::RunOptions;
use clap::Parser;

/// Query, mutate and re-render .env files.
#[derive(Debug, Parser)]
#[command(
    name = "envkit",
    author,
    version,
    about = "Query, mutate and re-render .env files",
    long_about = "envkit Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Reads a .env file, answers --has/--is queries through the exit\n\
                  code, applies a single --add or --rm and re-renders the result\n\
                  as plain text, JSON, INI, YAML, TOML or XML.",
    after_help = "CONFIG FILES:\n\n\
                  Settings are read from --config, else $ENVKIT_CONFIG_FILE, else\n\
                  <config dir>/envkit/config.toml when it exists. ENVKIT_* variables\n\
                  such as ENVKIT_GUARD__NEVER_WRITE_PRODUCTION=false override the file.\n\
                  Files named .env.production are never written unless that guard is\n\
                  turned off."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub operation: OperationArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

impl Cli {
    /// Resolves the parsed flags into engine options.
    #[must_use]
    pub fn to_run_options(&self, defaults: &FlagDefaults) -> RunOptions {
        let operation = &self.operation;
        RunOptions::builder()
            .maybe_path(self.target.file.clone())
            .key(self.target.env.clone().unwrap_or_default())
            .value(self.target.value.clone().unwrap_or_default())
            .maybe_query(operation.query_mode())
            .negate(operation.negate)
            .maybe_mutation(operation.mutation())
            .print(operation.print || defaults.print)
            .write(operation.write || defaults.write)
            .init(operation.init)
            .prod(self.target.prod)
            .mk_all(self.export.mk_all)
            .clean_all(operation.clean_all)
            .formats(self.export.formats(defaults))
            .build()
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
