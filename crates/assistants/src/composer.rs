//! The configuration composer.
//!
//! Resolves the persona a request runs with — persisted reference or inline
//! ephemeral definition — and layers the request-scoped LLM/prompt
//! overrides on top.  Resolution never mutates the registry copy; the
//! effective configuration lives only for the request it was composed for.

use std::sync::Arc;

use tc_domain::error::{Error, Result};
use tc_domain::persona::{
    LlmOverride, PersonaConfig, PersonaSelector, PromptConfig, PromptOverride, ToolConfig,
};
use tc_domain::trace::TraceEvent;

use crate::registry::PersonaRegistry;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Effective configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// How a resolved tool is implemented.
#[derive(Debug, Clone)]
pub enum ToolImplementation {
    /// Built-in implementation, referenced by id.
    BuiltIn { tool_id: i64 },
    /// Out-of-band API described by a schema document.
    OpenApi { schema: serde_json::Value },
}

/// A tool config after validation and display-name defaulting.
#[derive(Debug, Clone)]
pub struct ResolvedTool {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub implementation: ToolImplementation,
}

/// The configuration one request actually runs with.
#[derive(Debug, Clone)]
pub struct EffectiveAssistant {
    /// `None` when composed from an inline definition.
    pub persona_id: Option<i64>,
    pub persona: PersonaConfig,
    /// Final model choice after layering the request override on the
    /// persona's own override.
    pub model_provider: Option<String>,
    pub model_version: Option<String>,
    pub temperature: Option<f64>,
    /// Persona prompts with any request-scoped prompt override applied.
    pub prompts: Vec<PromptConfig>,
    pub tools: Vec<ResolvedTool>,
}

/// Pick the persona source for a request: an inline definition wins over
/// the session's persisted persona when both are supplied.
pub fn select_persona(inline: Option<PersonaConfig>, persona_id: i64) -> PersonaSelector {
    match inline {
        Some(config) => PersonaSelector::Inline { config },
        None => PersonaSelector::Reference { persona_id },
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Composer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct Composer {
    registry: Arc<PersonaRegistry>,
}

impl Composer {
    pub fn new(registry: Arc<PersonaRegistry>) -> Self {
        Self { registry }
    }

    /// Compose the effective configuration for one request.
    ///
    /// Lookup failures and soft-deleted references are `NotFound`; a
    /// malformed ephemeral tool config is `Configuration`.  Overrides apply
    /// to the returned value only.
    pub fn compose(
        &self,
        selector: &PersonaSelector,
        llm_override: Option<&LlmOverride>,
        prompt_override: Option<&PromptOverride>,
    ) -> Result<EffectiveAssistant> {
        let (persona_id, persona, source) = match selector {
            PersonaSelector::Inline { config } => (None, config.clone(), "inline"),
            PersonaSelector::Reference { persona_id } => {
                let persona = self
                    .registry
                    .get(*persona_id)
                    .filter(|p| !p.deleted)
                    .ok_or_else(|| Error::NotFound(format!("persona {persona_id}")))?;
                (Some(*persona_id), persona, "reference")
            }
        };

        let tools = persona
            .tools
            .iter()
            .map(resolve_tool)
            .collect::<Result<Vec<_>>>()?;

        let model_provider = llm_override
            .and_then(|o| o.model_provider.clone())
            .or_else(|| persona.llm_model_provider_override.clone());
        let model_version = llm_override
            .and_then(|o| o.model_version.clone())
            .or_else(|| persona.llm_model_version_override.clone());
        let temperature = llm_override.and_then(|o| o.temperature);

        let prompts = persona
            .prompts
            .iter()
            .map(|p| apply_prompt_override(p, prompt_override))
            .collect();

        TraceEvent::PersonaResolved {
            source,
            persona_id,
            tools: tools.len(),
        }
        .emit();

        Ok(EffectiveAssistant {
            persona_id,
            persona,
            model_provider,
            model_version,
            temperature,
            prompts,
            tools,
        })
    }
}

/// Validate one ephemeral tool config and default its display name.
fn resolve_tool(tool: &ToolConfig) -> Result<ResolvedTool> {
    let implementation = match (tool.in_code_tool_id, &tool.openapi_schema) {
        (Some(tool_id), None) => ToolImplementation::BuiltIn { tool_id },
        (None, Some(schema)) => {
            let valid = schema.as_object().is_some_and(|o| !o.is_empty());
            if !valid {
                return Err(Error::Configuration(format!(
                    "tool '{}': openapi_schema must be a non-empty object",
                    tool.name
                )));
            }
            ToolImplementation::OpenApi {
                schema: schema.clone(),
            }
        }
        (None, None) => {
            return Err(Error::Configuration(format!(
                "tool '{}': needs in_code_tool_id or openapi_schema",
                tool.name
            )))
        }
        (Some(_), Some(_)) => {
            return Err(Error::Configuration(format!(
                "tool '{}': in_code_tool_id and openapi_schema are mutually exclusive",
                tool.name
            )))
        }
    };

    Ok(ResolvedTool {
        name: tool.name.clone(),
        display_name: tool
            .display_name
            .clone()
            .unwrap_or_else(|| tool.name.clone()),
        description: tool.description.clone(),
        implementation,
    })
}

fn apply_prompt_override(
    prompt: &PromptConfig,
    prompt_override: Option<&PromptOverride>,
) -> PromptConfig {
    let mut prompt = prompt.clone();
    if let Some(ovr) = prompt_override {
        if let Some(system) = &ovr.system_prompt {
            prompt.system_prompt = system.clone();
        }
        if let Some(task) = &ovr.task_prompt {
            prompt.task_prompt = task.clone();
        }
    }
    prompt
}
