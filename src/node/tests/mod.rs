//! Unit tests for node task state tracking.
//!
//! Tests are organised by component: domain values, the lifecycle index,
//! the task registry, the snapshot codec and the scheduler state service.
