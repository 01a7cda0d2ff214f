/// Ledger Mock Server Library
///
/// This crate provides both a standalone binary and library components
/// for an in-memory fullnode that answers transaction lookups by hash.

pub mod handlers;
pub mod server;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use server::{create_router, run_server, spawn_local};
pub use store::{LedgerStore, StoreError, TransactionStatus};
pub use types::*;
