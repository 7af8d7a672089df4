//! Domain model for agent cards.
//!
//! [`AgentCard`] is the aggregate root; it owns its [`ExtensionRecord`]s and
//! produces the raw and strict export documents.

mod capabilities;
mod card;
mod error;
mod export;
mod extension;
mod identity;
mod ids;
mod import;
mod profile;
mod rules;
mod transport;

pub use capabilities::CardCapabilities;
pub use card::{AgentCard, NewAgentCard, PersistedAgentCardData};
pub use error::{AgentCardDomainError, ExtensionError};
pub use export::{ExportError, METADATA_KEY};
pub use extension::{ExtensionDraft, ExtensionRecord, PersistedExtensionData};
pub use identity::{AgentName, AgentVersion};
pub use ids::{AgentCardId, ExtensionId};
pub use import::{CardDocument, ImportError, LEGACY_EXTENSIONS_KEY};
pub use profile::CardProfile;
pub use rules::{SECURITY_SCHEME_TYPES, check_identity, check_profile};
pub use transport::{ParseTransportError, Transport};
