// Application layer - Use case interactors

pub mod container;
pub mod merge_interactor;
pub mod split_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use merge_interactor::{MergeInteractor, MergeJob, MergeReport};
pub use split_interactor::{ClipOutcome, SplitInteractor, SplitJob, SplitReport};
