//! # Filterstate Architecture
//!
//! Filterstate keeps a list view's filter and pagination selection in sync with
//! the URL query string, so that filtered, paginated views can be shared,
//! bookmarked and reloaded. It is a library that happens to ship a CLI client;
//! the same core can sit behind a web frontend, a server-side renderer or a test
//! harness.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, loads config, sets up logging          │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Panel (panel.rs)                                           │
//! │  - What is selected? What should the URL become?            │
//! │  - Child-field activation and cleanup, page reset           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Codec + Pagination (codec.rs, pagination.rs)               │
//! │  - Pure functions over QueryState snapshots                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry + QueryState (registry.rs, query.rs)              │
//! │  - Immutable filter catalog, ordered query multimap         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Snapshots In, Snapshots Out
//!
//! The navigation layer owns the current query. Every operation here borrows a
//! snapshot and returns a new one; nothing is mutated in place and nothing is
//! cached between calls. A full interaction (decode, compute, encode, hand
//! off) produces exactly one replacement, which is what keeps a parent change
//! and its child cleanup from ever being observed separately.
//!
//! Everything from `panel.rs` inward is total: bad page numbers fall back to
//! defaults, unknown keys pass through. The only fallible paths are building a
//! [`registry::Registry`] and loading [`config::FilterConfig`].
//!
//! ## Module Overview
//!
//! - [`registry`]: Filter definitions and the catalog
//! - [`query`]: `QueryState` and its urlencoded wire form
//! - [`codec`]: Encode/decode between query and selections
//! - [`pagination`]: Page and page size normalization
//! - [`panel`]: The controller a UI drives
//! - [`config`]: Loading definitions from `filters.json`
//! - [`error`]: Error types

pub mod codec;
pub mod config;
pub mod error;
pub mod pagination;
pub mod panel;
pub mod query;
pub mod registry;
