//! # Cadastro Architecture
//!
//! Cadastro is a **UI-agnostic client registry library**. Each client is
//! identified by a CPF, the Brazilian individual taxpayer number, and the
//! library guarantees that only well-formed, check-digit-valid, unique CPFs
//! are ever persisted. The binary is one client of the library; it is not the
//! library.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, picks the backend, formats output      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes identifiers (CPF or record id)                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, uniqueness, merge and soft-delete rules      │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract ClientStore trait                               │
//! │  - FileStore (JSON list), DocumentStore (keyed collection)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward (API, commands, storage), code:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** calls `std::process::exit`
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): thorough unit tests of the business
//!    rules against an in-memory document collection.
//! 2. **API** (`api.rs`): dispatch and message tests.
//! 3. **Stores**: each backend is tested on its own, and `tests/` runs the
//!    same scenarios against every backend.
//! 4. **CLI**: end-to-end runs of the binary in a temporary data directory.
//!
//! ## Module Overview
//!
//! - [`cpf`]: CPF normalization, check digits and formatting
//! - [`validation`]: Name, CPF and email rules
//! - [`model`]: Core data types (`ClientRecord`, `Address`, patches)
//! - [`store`]: Storage abstraction and implementations
//! - [`commands`]: Business logic for each operation
//! - [`api`]: The API facade, entry point for all operations
//! - [`config`]: Configuration management
//! - [`backup`]: Timestamped copies of the JSON data file
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod backup;
pub mod commands;
pub mod config;
pub mod cpf;
pub mod error;
pub mod model;
pub mod store;
pub mod validation;
