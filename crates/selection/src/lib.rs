//! Advertisement selection — targeting-filtered, CTR-ranked choice of the ad
//! to render for a request.

pub mod logic;

pub use logic::{
    AdvertisementSelectionLogic, ContentSource, ProfileSource, RankedCandidate,
    TargetingGroupSource,
};
