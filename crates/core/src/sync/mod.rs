//! Batch synchronization engine
//!
//! [`SyncService`] fetches a batch through a [`ProfileSource`], hands it to
//! the [`Dispatcher`], which runs the [`Reconciler`] over every record with
//! a concurrency cap.

pub mod dispatcher;
pub mod ports;
pub mod reconciler;
pub mod service;

pub use dispatcher::Dispatcher;
pub use ports::{NoopObserver, ProfileSource, SyncObserver};
pub use reconciler::{compare_freshness, Reconciler};
pub use service::SyncService;
