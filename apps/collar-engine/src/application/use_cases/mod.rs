//! Application Use Cases
//!
//! One use case per engine operation; each is generic over the ports it
//! needs and holds its collaborators behind `Arc`.

pub mod cancel_position;
pub mod cancel_roll_offer;
pub mod create_roll_offer;
pub mod execute_roll;
pub mod open_position;
pub mod settle_position;
pub mod withdraw;

pub use cancel_position::{CancelPositionRequest, CancelPositionUseCase};
pub use cancel_roll_offer::{CancelRollOfferRequest, CancelRollOfferUseCase};
pub use create_roll_offer::{CreateRollOfferRequest, CreateRollOfferUseCase};
pub use execute_roll::{ExecuteRollRequest, ExecuteRollUseCase, RollExecution};
pub use open_position::{OpenPositionRequest, OpenPositionUseCase, OpenedPosition};
pub use settle_position::{SettlePositionRequest, SettlePositionUseCase, Settlement};
pub use withdraw::{WithdrawRequest, WithdrawUseCase};
