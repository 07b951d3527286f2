// envkit: query, mutate and re-render .env files
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)        config (Settings)
//!                |              file < ENVKIT_* env
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          engine           |
//!              |  query, mutation, guard,  |
//!              |  file snapshot, run()     |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!              dotenv      export    accessor
//!            store+scan   formats,   typed env
//!                          clean      reads
//!
//!   +-----------------------------------------+
//!   |  foundation       error, logging        |
//!   +-----------------------------------------+
//! ```

pub mod accessor;
pub mod cli;
pub mod config;
pub mod dotenv;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
