//! Roll Offer Aggregate

mod roll_offer;

pub use roll_offer::{CreateRollOfferCommand, RollOffer, RollOfferStatus};
