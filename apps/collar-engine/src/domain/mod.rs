//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Aggregates**: Consistency boundaries with invariants
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`positions`]: Paired-position lifecycle and settlement math
//! - [`rolls`]: Roll offers, the price-sensitive fee, and the conservation proof

pub mod positions;
pub mod rolls;
pub mod shared;
