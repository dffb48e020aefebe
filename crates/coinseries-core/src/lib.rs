//! # Coinseries Core
//!
//! Validated query service over crypto price/volume history.
//!
//! ## Overview
//!
//! - **Domain values** for asset ids, columnar series and summary outcomes
//! - **Service** that validates input before any store access
//! - **Structured errors** with a stable kind, code and status hint
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | `AssetId`, `TimeSeries`, `SummaryOutcome` |
//! | [`error`] | `ServiceError` and `ServiceErrorKind` |
//! | [`service`] | `TimeseriesService` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use coinseries_core::{TimeseriesService, Warehouse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!     let service = TimeseriesService::new(Arc::new(warehouse));
//!
//!     let page = service.get_paginated_data("bitcoin", 10, 0).await?;
//!     println!("{} rows", page.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use coinseries_core::{ServiceError, ServiceErrorKind};
//!
//! fn handle_error(error: ServiceError) {
//!     match error.kind() {
//!         ServiceErrorKind::InvalidArgument => {
//!             // Report to user
//!         }
//!         ServiceErrorKind::NotFound => {
//!             // Nothing matched
//!         }
//!         ServiceErrorKind::ExecutionFailure => {
//!             // Store fault; see the error source
//!         }
//!     }
//! }
//! ```

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{AssetId, SummaryOutcome, TimeSeries};
pub use error::{ServiceError, ServiceErrorKind};
pub use service::TimeseriesService;

// Warehouse (re-exported from coinseries-warehouse)
pub use coinseries_warehouse::{
    FilterCriteria, HistoricalRecord, PaginationWindow, QueryGuardrails, RecordTimestamp,
    SummaryStats, TimeseriesStore, Warehouse, WarehouseConfig, WarehouseError,
};
