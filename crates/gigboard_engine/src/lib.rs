//! Gigboard engine: hosted-backend IO and effect execution.
mod client;
mod coerce;
mod engine;
mod identity;
mod table;
mod types;

pub use client::BackendSettings;
pub use coerce::{coerce_row, coerce_rows, parse_date, ColumnMap, RowError};
pub use engine::{EngineConfig, EngineHandle, DEFAULT_TABLE};
pub use identity::{GoTrueIdentityProvider, IdentityProvider, SessionStore};
pub use table::{PageFetcher, RestTableReader, TableReader};
pub use types::{
    AuthError, AuthFailureKind, AuthOp, AuthSession, EngineEvent, FailureKind, FetchError, Page,
};
