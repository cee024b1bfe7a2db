//! decant-core - release discovery and binary installation
//!
//! This crate implements the engine behind the `decant` CLI: it turns a
//! short identifier like `ekristen/aws-nuke@3.1.1` or `codeberg/forgejo/forgejo`
//! into a concrete release on a hosting service, picks the right asset for
//! the current platform, and downloads it with integrity bookkeeping.
//!
//! # Architecture
//!
//! ```text
//! identifier ("[provider/]owner/repo[@version]")
//!     │
//!     ▼
//! ident::parse ──────► Source (one provider-typed descriptor)
//!     │                    │ pre_run()
//!     │                    ▼
//!     │            resolve::find_release ◄── clients::* (per-host API)
//!     │                    │                      │
//!     │                    │                cache::HttpCache (disk)
//!     │                    ▼
//!     │                 Release ── select::pick ── one ReleaseAsset
//!     │                                │ run()
//!     │                                ▼
//!     └──────────────────── download::fetch (stream + sha256 sidecar)
//! ```

pub mod cache;
pub mod clients;
pub mod config;
pub mod download;
pub mod ident;
pub mod inventory;
pub mod resolve;
pub mod select;
pub mod source;

pub use config::{Config, Options};
pub use source::Source;

/// User agent sent on every outbound request, discovery and download alike.
pub const USER_AGENT: &str = concat!("decant/", env!("CARGO_PKG_VERSION"));
