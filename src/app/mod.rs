// Application layer - Use case interactors

pub mod artifact_interactor;
pub mod clip_interactor;
pub mod container;

// Re-export interactors
pub use artifact_interactor::ArtifactInteractor;
pub use clip_interactor::{ClipInteractor, ClipRequest, ClipResponse};
pub use container::{AppContainer, DefaultAppContainer};
