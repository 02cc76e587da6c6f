//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod dataset_repo;
pub mod explanation_repo;
pub mod ml_model_repo;
pub mod task_meta_repo;
pub mod understanding_repo;

pub use dataset_repo::DatasetRepo;
pub use explanation_repo::ExplanationRepo;
pub use ml_model_repo::MlModelRepo;
pub use task_meta_repo::TaskMetaRepo;
pub use understanding_repo::UnderstandingRepo;
