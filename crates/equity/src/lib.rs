#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/equity/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Equity profile assembly.
//!
//! This crate re-exports the core types and provider implementations, and
//! provides the [`ProfileBuilder`] that turns a symbol into an
//! [`EquityProfile`].
//!
//! # Example
//!
//! ```rust,ignore
//! use equity::{ProfileBuilder, ProfileConfig, Symbol, TracingProgressSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> equity::Result<()> {
//!     let config = ProfileConfig::default().with_user_agent("MyApp/1.0 (contact@example.com)");
//!     let builder = ProfileBuilder::from_config(&config)?
//!         .with_progress_sink(Arc::new(TracingProgressSink));
//!
//!     let profile = builder.build(&Symbol::new("AAPL")).await?;
//!     println!("{:?}", profile);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use equity_core::*;

// Providers
#[cfg(feature = "edgar")]
pub use equity_edgar::{EdgarDocument, EdgarProvider, XbrlStatementParser};
#[cfg(feature = "yahoo")]
pub use equity_yahoo::YahooProvider;

mod builder;
pub use builder::{ProfileBuilder, assemble};

mod progress;
pub use progress::{TracingProgressSink, notify_best_effort};

mod selector;
pub use selector::{FilingPair, FilingPairSelector};
