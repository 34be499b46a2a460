//! Core of fitplan: exercise catalog, workout plan and daily progress.
//!
//! [`store::Store`] owns all application state. Presentation code reads it,
//! validates user input with [`validation`], and calls the store's
//! mutations. The exercise catalog is fetched through [`catalog::Catalog`],
//! which always yields a usable list by falling back to sample data.

pub mod browse;
pub mod catalog;
pub mod model;
pub mod store;
pub mod tracking;
pub mod validation;

pub use catalog::{Catalog, CatalogFetch, ExerciseFilter, FallbackReason, FetchOrigin};
pub use model::{
    ExerciseRecord, Goal, PlanItem, PlanItemUpdate, ProfileDraft, ProfileUpdate, ProgressEntry,
    ProgressUpdate, UserProfile,
};
pub use store::{AddOutcome, Store};
pub use validation::{
    PlanField, PlanValidation, ProfileField, ProfileValidation, validate_confirmation,
    validate_profile,
};
