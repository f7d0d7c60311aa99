//! Shared model, collaborator traits, errors and configuration for
//! advertisement selection.

pub mod config;
pub mod dao;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use dao::ReadableDao;
pub use error::{AdSelectionError, SelectionResult};
pub use types::{
    AdvertisementContent, AgeRange, CategorySpend, CustomerProfile, GeneratedAdvertisement,
    RequestContext,
};
