//! Per-model request budget resolution.

use tracing::debug;

/// Budget applied when no table entry matches a model identifier.
pub const DEFAULT_FALLBACK_RPM: u32 = 100;

/// Maps model identifiers to requests-per-minute budgets.
///
/// The table is an ordered list of `(key, rpm)` pairs; resolution is a pure
/// lookup and the table is never mutated after construction. Lookup order:
///
/// 1. Exact match on the full identifier.
/// 2. Substring match: take the segment after the last `/` (providers
///    namespace models as `provider/model`) and return the first table key
///    contained in it, in table order.
/// 3. The conservative fallback.
///
/// # Examples
///
/// ```
/// use vermeer_rate_limit::BudgetPolicy;
///
/// let policy = BudgetPolicy::default();
/// assert_eq!(policy.resolve("gemini/gemini-2.0-flash"), 2000);
/// assert_eq!(policy.resolve("gpt-3.5-turbo"), 500);
/// assert_eq!(policy.resolve("totally-unknown-model"), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetPolicy {
    entries: Vec<(String, u32)>,
    fallback_rpm: u32,
}

impl Default for BudgetPolicy {
    /// Default per-minute budgets for common providers.
    fn default() -> Self {
        Self::new(
            [
                ("gpt-3.5-turbo", 500), // OpenAI default tier
                ("gpt-4", 200),         // OpenAI default tier
                ("gemini-pro", 600),    // Google Cloud default
                ("claude-2", 400),      // Anthropic estimate
                ("gemini/gemini-2.0-flash", 2000),
            ]
            .into_iter()
            .map(|(model, rpm)| (model.to_string(), rpm)),
            DEFAULT_FALLBACK_RPM,
        )
    }
}

impl BudgetPolicy {
    /// Build a policy from `(model key, rpm)` pairs, in resolution order.
    pub fn new(entries: impl IntoIterator<Item = (String, u32)>, fallback_rpm: u32) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            fallback_rpm,
        }
    }

    /// The budget used when nothing matches.
    pub fn fallback_rpm(&self) -> u32 {
        self.fallback_rpm
    }

    /// The table entries in resolution order.
    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    /// Resolve the requests-per-minute budget for a model identifier.
    pub fn resolve(&self, model: &str) -> u32 {
        if let Some((_, rpm)) = self.entries.iter().find(|(key, _)| key == model) {
            debug!(model, rpm, "budget resolved by exact match");
            return *rpm;
        }

        // Only the portion after the last namespace separator participates
        // in substring matching.
        let base_model = model.rsplit('/').next().unwrap_or(model);
        for (key, rpm) in &self.entries {
            if base_model.contains(key.as_str()) {
                debug!(model, key, rpm, "budget resolved by substring match");
                return *rpm;
            }
        }

        debug!(model, rpm = self.fallback_rpm, "budget fell back to default");
        self.fallback_rpm
    }
}
