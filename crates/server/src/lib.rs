//! Server crate for the film recommendation engine.
//!
//! This crate contains the orchestrator that coordinates all components
//! of the recommendation pipeline, along with the per-session exclusion
//! store and the engine configuration.

pub mod config;
pub mod error;
pub mod infographic;
pub mod orchestrator;
pub mod session;

pub use config::EngineConfig;
pub use error::{RecommendError, Result};
pub use infographic::{build_infographic, CountEntry, Infographic};
pub use orchestrator::{RecommendRequest, RecommendationOrchestrator, Refinement, DEFAULT_K};
pub use session::{new_session_id, InMemorySessionStore, SessionId, SessionStore, DEFAULT_MAX_SESSIONS};
