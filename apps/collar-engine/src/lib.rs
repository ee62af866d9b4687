// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Collar Engine - Rust Core Library
//!
//! Deterministic paired-position and roll engine for the Collar system: a
//! taker locks a quote-asset amount against a provider's opposite payout
//! band, the pair settles from an oracle price at expiry, and a live pair
//! can be rolled into a new one at updated terms with exact fund
//! conservation.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, services)
//!   - `positions`: Position aggregate, strike math, settlement split
//!   - `rolls`: RollOffer aggregate, fee formula, conservation proof
//!   - `shared`: amounts, prices, basis points, identifiers, time
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for collaborators (`PriceOraclePort`,
//!     `ProviderPositionStorePort`, `AssetLedgerPort`, ...)
//!   - `use_cases`: `OpenPosition`, `SettlePosition`, `CancelPosition`,
//!     `Withdraw`, `CreateRollOffer`, `CancelRollOffer`, `ExecuteRoll`
//!
//! - **Infrastructure**: In-memory reference adapters for every port
//!
//! Expiry and deadline checks take a caller-supplied current time; the
//! engine keeps no clock, scheduler, or retry loop. Every operation is a
//! one-shot atomic state transition whose state is written before any
//! asset transfer is issued.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - In-memory reference adapters.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

/// Structured logging setup.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::positions::{
    Position, PositionStatus, ProviderRef, SettlementOutcome, SettlementTerms, StrikeRange,
};
pub use domain::rolls::{FeeTerms, RollCalculator, RollOffer, RollOfferStatus, RollPreview};
pub use domain::shared::{
    AccountId, Amount, AssetId, BasisPoints, DurationSecs, OfferId, PositionId, Price,
    ProviderPositionId, RollOfferId, SignedAmount, UnixTime,
};

// Application re-exports
pub use application::EngineError;
pub use application::ports::{
    AssetLedgerPort, AuthorizationRegistryPort, CertificateRegistryPort, PriceOraclePort,
    ProviderPositionStorePort,
};
pub use application::use_cases::{
    CancelPositionUseCase, CancelRollOfferUseCase, CreateRollOfferUseCase, ExecuteRollUseCase,
    OpenPositionUseCase, SettlePositionUseCase, WithdrawUseCase,
};

// Infrastructure re-exports
pub use infrastructure::authorization::StaticAuthorizationRegistry;
pub use infrastructure::certificates::InMemoryCertificateRegistry;
pub use infrastructure::ledger::InMemoryAssetLedger;
pub use infrastructure::oracle::MockPriceOracle;
pub use infrastructure::persistence::{InMemoryPositionRepository, InMemoryRollOfferRepository};
pub use infrastructure::provider_store::InMemoryProviderStore;

pub use config::{EngineConfig, load_config};
