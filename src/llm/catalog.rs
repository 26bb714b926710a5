pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub env_var: &'static str,
    pub base_url: &'static str,
    pub models: &'static [ModelInfo],
}

pub struct ModelInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub recommended: bool,
}

pub const DEFAULT_PROVIDER: &str = "perplexity";

pub static PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "perplexity",
        name: "Perplexity",
        env_var: "PERPLEXITY_API_KEY",
        base_url: "https://api.perplexity.ai",
        models: &[
            ModelInfo { id: "sonar-pro", label: "Sonar Pro", recommended: true },
            ModelInfo { id: "sonar", label: "Sonar", recommended: false },
            ModelInfo { id: "sonar-reasoning-pro", label: "Sonar Reasoning Pro", recommended: false },
            ModelInfo { id: "sonar-deep-research", label: "Sonar Deep Research", recommended: false },
        ],
    },
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        env_var: "OPENAI_API_KEY",
        base_url: "https://api.openai.com/v1",
        models: &[
            ModelInfo { id: "gpt-4o", label: "GPT-4o", recommended: true },
            ModelInfo { id: "gpt-4o-mini", label: "GPT-4o Mini", recommended: false },
        ],
    },
];

pub fn get_provider(id: &str) -> Option<&'static ProviderInfo> {
    PROVIDERS.iter().find(|p| p.id == id)
}

pub fn get_default_model(provider_id: &str) -> &'static str {
    get_provider(provider_id)
        .and_then(|p| p.models.iter().find(|m| m.recommended))
        .map(|m| m.id)
        .unwrap_or("sonar-pro")
}
