//! # bima-core
//!
//! Domain logic for health-insurance guidance in India: claim-rejection scoring,
//! plan classification and resolution against a scored policy catalogue, and a
//! multilingual assistant with optional voice replies.
//!
//! External systems (policy store, language model, speech synthesis) are reached
//! only through the [`PolicyStore`], [`LanguageModel`] and [`SpeechSynthesizer`]
//! traits. Every adapter failure is absorbed by the component that made the call
//! and replaced with a local fallback, so the public operations here never fail
//! on account of a remote service.
//!
//! ```rust,no_run
//! use bima_core::{ProfileForm, Resolver, RetryPolicy};
//!
//! # async fn example() {
//! let resolver = Resolver::new(None, RetryPolicy::default());
//! let form = ProfileForm {
//!     age: Some("70".into()),
//!     budget: Some("9000".into()),
//!     coverage_amount: Some("5".into()),
//!     ..ProfileForm::default()
//! };
//! let plans = resolver.recommend(&form).await;
//! assert_eq!(plans.len(), 2);
//! # }
//! ```

pub mod assistant;
pub mod cards;
pub mod claim;
pub mod error;
pub mod fallback;
pub mod fit;
pub mod intake;
pub mod language;
pub mod playback;
pub mod policy;
pub mod profile;
pub mod resolver;
pub mod session;

// Re-export commonly used types
pub use assistant::{
    Assistant, ChatMessage, CompletionRequest, LanguageModel, Reply, Role, SpeechAudio,
    SpeechSynthesizer,
};
pub use cards::PlanCard;
pub use claim::{ClaimCase, RejectionAssessment, RiskFactor, assess};
pub use error::{AdapterError, Result, ValidationError};
pub use fit::{FitAssessment, FitInput, assess_fit};
pub use intake::IntakeWizard;
pub use language::Language;
pub use playback::{AudioPlayback, AudioPlayer};
pub use policy::{InMemoryPolicyStore, InsurancePolicy, PolicyFeature, PolicyQuery, PolicyStore};
pub use profile::{PlanType, ProfileForm, UserProfile};
pub use resolver::{PolicySource, RankedPolicy, Resolver, RetryPolicy};
pub use session::{ChatSession, ChatState, ConversationTurn};
