// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings::load --> Logging --> Engine::run --> ExitCode
//! ```

use std::process::ExitCode;

use envkit::cli;
use envkit::config::Settings;
use envkit::engine::Engine;
use envkit::logging::init_logging;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let settings = match Settings::load(cli.global.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = cli.global.log_config(&settings.log);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let options = cli.to_run_options(&settings.defaults);
    let engine = Engine::new(settings);
    let mut stdout = std::io::stdout().lock();

    match engine.run(&options, &mut stdout) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error: {:#}", anyhow::Error::from(e));
            ExitCode::FAILURE
        }
    }
}
