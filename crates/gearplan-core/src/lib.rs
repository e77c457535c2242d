//! Gearplan Core -- the calculation engine for game upgrade planners.
//!
//! This crate provides progression tables, the tool abstraction, the engine
//! (tool registry + result cache), input validation, text export, result
//! history, and result diffing that every Gearplan frontend depends on.
//!
//! # Control Flow
//!
//! A caller registers tools once at startup via [`engine::Engine::register`],
//! then drives calculations with [`engine::Engine::calculate`]:
//!
//! 1. **Resolve** -- Look up the tool by id.
//! 2. **Cache** -- Build the canonical (sorted-key) cache key from the
//!    inputs; on a hit the stored result is returned unchanged.
//! 3. **Validate** -- Check every input against the tool's field schema and
//!    its optional custom rule; all violations are reported together.
//! 4. **Aggregate** -- Walk each declared slot over its bound table, summing
//!    the `(current, target]` index range into per-resource totals.
//! 5. **Derive** -- Compute `lack_* = max(0, need - have)` shortfalls and
//!    the overall `sufficient` flag.
//! 6. **Wrap** -- Stamp provenance (tool id, RFC 3339 timestamp, echoed
//!    inputs), cache with insert-if-absent, and return.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- Tool registry and result cache.
//! - [`table::ProgressionTable`] -- Ordered, indexed cost table with O(1)
//!   point lookup and O(range) contiguous range sums.
//! - [`tool::RangeAggregator`] -- The standard slot-walk aggregation.
//! - [`cost::CostBundle`] -- Sorted resource -> amount map; missing
//!   resources read as zero.
//! - [`result::CalculationResult`] -- Immutable, value-comparable output
//!   record, safe to cache and persist.
//! - [`history::ResultLog`] -- Bounded newest-first history / favorites.

pub mod amount;
pub mod cache;
pub mod compare;
pub mod cost;
pub mod engine;
pub mod export;
pub mod field;
pub mod history;
pub mod inputs;
pub mod result;
pub mod table;
pub mod tool;
