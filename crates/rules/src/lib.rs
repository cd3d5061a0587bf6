//! Claim adjudication rule engine.
//!
//! This crate provides:
//! - Typed per-column predicates (threshold, equality, membership, null-check)
//! - Inclusion/exclusion trigger resolution with annotation appending
//! - An ordered rule registry with per-rule fault isolation
//! - Cross-row grouping rules over claim/pre-auth buckets
//! - The built-in rule catalog carried as data

pub mod catalog;
pub mod condition;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod registry;
pub mod resolver;

pub use condition::{extra_conditions_mask, predicate_mask, ExtraCondition, Mask, Operand, Predicate};
pub use error::{EngineError, Result};
pub use grouping::{claim_group_key, group_flag, strict_claim_group_key, PairScope};
pub use pipeline::process;
pub use registry::{RuleInfo, RuleRegistry};
pub use resolver::{append_where, resolve, TriggerSpec};
