//! Persisted persona registry.
//!
//! In-memory map of persona id to configuration, seeded with the process
//! default persona.  Deep persistence is an external collaborator; this is
//! the lookup surface the composer resolves references against.

use std::collections::HashMap;

use parking_lot::RwLock;

use tc_domain::config::ChatDefaults;
use tc_domain::persona::{PersonaConfig, PromptConfig};

pub struct PersonaRegistry {
    personas: RwLock<HashMap<i64, PersonaConfig>>,
    next_id: RwLock<i64>,
}

impl PersonaRegistry {
    /// Build a registry seeded with the default persona at the configured
    /// default id.
    pub fn with_default(defaults: &ChatDefaults) -> Self {
        let default_persona = PersonaConfig {
            name: "Default".into(),
            description: "Answers questions over the connected document sets".into(),
            search_type: defaults.default_search_type,
            num_chunks: None,
            llm_relevance_filter: false,
            llm_filter_extraction: false,
            recency_bias: Default::default(),
            llm_model_provider_override: None,
            llm_model_version_override: None,
            starter_messages: None,
            default_persona: true,
            is_visible: true,
            display_priority: Some(0),
            deleted: false,
            is_public: true,
            prompts: vec![PromptConfig {
                name: "Answer-Question".into(),
                description: "Answer the user's question using retrieved context".into(),
                system_prompt: "You are a helpful assistant. Answer using the provided \
                                documents and cite them."
                    .into(),
                task_prompt: String::new(),
                include_citations: true,
                datetime_aware: true,
            }],
            document_sets: Vec::new(),
            tools: Vec::new(),
        };

        let mut personas = HashMap::new();
        personas.insert(defaults.default_persona_id, default_persona);

        Self {
            personas: RwLock::new(personas),
            next_id: RwLock::new(defaults.default_persona_id + 1),
        }
    }

    /// Look up a persona by id.  Soft-deleted personas are still returned;
    /// callers decide whether deleted counts as present.
    pub fn get(&self, persona_id: i64) -> Option<PersonaConfig> {
        self.personas.read().get(&persona_id).cloned()
    }

    /// Register a new persona and return its minted id.
    pub fn insert(&self, config: PersonaConfig) -> i64 {
        let mut next = self.next_id.write();
        let id = *next;
        *next += 1;
        self.personas.write().insert(id, config);
        id
    }

    /// Replace the persona at an existing id, or create it there.
    pub fn upsert(&self, persona_id: i64, config: PersonaConfig) {
        self.personas.write().insert(persona_id, config);
        let mut next = self.next_id.write();
        if persona_id >= *next {
            *next = persona_id + 1;
        }
    }

    /// Soft-delete a persona.  Returns false if the id is unknown.
    pub fn mark_deleted(&self, persona_id: i64) -> bool {
        let mut personas = self.personas.write();
        match personas.get_mut(&persona_id) {
            Some(persona) => {
                persona.deleted = true;
                true
            }
            None => false,
        }
    }

    /// Visible, non-deleted personas ordered by display priority then id.
    pub fn list_visible(&self) -> Vec<(i64, PersonaConfig)> {
        let personas = self.personas.read();
        let mut out: Vec<(i64, PersonaConfig)> = personas
            .iter()
            .filter(|(_, p)| p.is_visible && !p.deleted)
            .map(|(id, p)| (*id, p.clone()))
            .collect();
        out.sort_by_key(|(id, p)| (p.display_priority.unwrap_or(i32::MAX), *id));
        out
    }

    pub fn len(&self) -> usize {
        self.personas.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_with_default_persona() {
        let registry = PersonaRegistry::with_default(&ChatDefaults::default());
        let persona = registry.get(0).unwrap();
        assert!(persona.default_persona);
        assert_eq!(persona.prompts.len(), 1);
    }

    #[test]
    fn insert_mints_fresh_ids() {
        let registry = PersonaRegistry::with_default(&ChatDefaults::default());
        let persona = registry.get(0).unwrap();
        let a = registry.insert(persona.clone());
        let b = registry.insert(persona);
        assert_ne!(a, b);
        assert!(a > 0);
    }

    #[test]
    fn deleted_personas_drop_out_of_listing() {
        let registry = PersonaRegistry::with_default(&ChatDefaults::default());
        let persona = registry.get(0).unwrap();
        let id = registry.insert(persona);
        assert_eq!(registry.list_visible().len(), 2);

        assert!(registry.mark_deleted(id));
        let visible = registry.list_visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0, 0);
        // Still addressable by id.
        assert!(registry.get(id).unwrap().deleted);
    }

    #[test]
    fn listing_orders_by_priority() {
        let registry = PersonaRegistry::with_default(&ChatDefaults::default());
        let mut persona = registry.get(0).unwrap();
        persona.default_persona = false;
        persona.display_priority = Some(-1);
        persona.name = "Pinned".into();
        registry.insert(persona);

        let visible = registry.list_visible();
        assert_eq!(visible[0].1.name, "Pinned");
    }
}
