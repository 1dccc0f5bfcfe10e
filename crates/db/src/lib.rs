//! Remote backend access for the gigram marketplace.
//!
//! Wraps the hosted Supabase project that owns all marketplace state:
//! PostgREST tables (profiles, jobs, applications, messages, payments)
//! and the object-storage bucket holding QR codes and payment proofs.
//! Every read is a live query — this layer keeps no authoritative state
//! and no cache.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod storage;

pub use client::SupabaseClient;
pub use config::BackendConfig;
pub use error::{DbError, DbResult};
