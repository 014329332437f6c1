//! Assistant configuration for tidechat.
//!
//! Holds the persisted persona registry and the configuration composer,
//! which resolves a persona reference or inline definition plus optional
//! request-scoped overrides into the effective configuration for one
//! request.

pub mod composer;
pub mod registry;

pub use composer::{
    select_persona, Composer, EffectiveAssistant, ResolvedTool, ToolImplementation,
};
pub use registry::PersonaRegistry;
