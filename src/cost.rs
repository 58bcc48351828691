//! Session cost tracking.
//!
//! Providers price completion tokens as a fixed multiple of prompt tokens, so
//! a model is described by its prompt price alone and the configured
//! `output_cost_ratio` supplies the rest.

use crate::types::{CompletionUsage, KnownModel, Model};

/// Prompt price assumed for models without a known price: $2.50 per 1M tokens.
pub const DEFAULT_PROMPT_PRICE: f64 = 2.5 / 1_000_000.0;

/// Prompt price per token in dollars for a known model.
pub fn prompt_price(model: &KnownModel) -> f64 {
    match model {
        KnownModel::Gpt4oMini => 0.15 / 1_000_000.0,
        KnownModel::Gpt4o => 2.5 / 1_000_000.0,
        KnownModel::O3Mini => 1.1 / 1_000_000.0,
    }
}

/// Running token totals and their dollar cost for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTracker {
    prompt_price: f64,
    output_cost_ratio: f64,
    usage: CompletionUsage,
}

impl CostTracker {
    /// Creates a tracker with an explicit per-token prompt price.
    pub fn new(prompt_price: f64, output_cost_ratio: f64) -> Self {
        Self {
            prompt_price,
            output_cost_ratio,
            usage: CompletionUsage::default(),
        }
    }

    /// Creates a tracker priced for `model`.
    ///
    /// Models without a known price are billed at [`DEFAULT_PROMPT_PRICE`].
    pub fn for_model(model: &Model, output_cost_ratio: f64) -> Self {
        let price = match model {
            Model::Known(known) => prompt_price(known),
            Model::Custom(name) => {
                tracing::warn!(
                    model = %name,
                    "unknown cost for model, assuming $2.50/1M prompt tokens"
                );
                DEFAULT_PROMPT_PRICE
            }
        };
        Self::new(price, output_cost_ratio)
    }

    /// Adds one completion's usage to the totals.
    pub fn record(&mut self, usage: &CompletionUsage) {
        self.usage = self.usage + *usage;
    }

    /// Total prompt tokens so far.
    pub fn prompt_tokens(&self) -> u64 {
        self.usage.prompt_tokens
    }

    /// Total completion tokens so far.
    pub fn completion_tokens(&self) -> u64 {
        self.usage.completion_tokens
    }

    /// Dollar cost of the session so far.
    pub fn cost(&self) -> f64 {
        let prompt_cost = self.usage.prompt_tokens as f64 * self.prompt_price;
        let completion_cost =
            self.usage.completion_tokens as f64 * self.prompt_price * self.output_cost_ratio;
        prompt_cost + completion_cost
    }
}

/// Formats a session cost for display.
///
/// Costs of a cent or more are shown to the cent, smaller but non-negligible
/// costs to four decimals, and anything at or below $0.0001 is not reported.
pub fn format_session_cost(cost: f64) -> Option<String> {
    if cost >= 0.01 {
        Some(format!("${cost:.2}"))
    } else if cost > 0.0001 {
        Some(format!("${cost:.4}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn known_prices() {
        assert!(approx(prompt_price(&KnownModel::Gpt4oMini), 0.15e-6));
        assert!(approx(prompt_price(&KnownModel::Gpt4o), 2.5e-6));
        assert!(approx(prompt_price(&KnownModel::O3Mini), 1.1e-6));
    }

    #[test]
    fn cost_uses_output_ratio() {
        let mut tracker = CostTracker::for_model(&Model::Known(KnownModel::Gpt4o), 4.0);
        tracker.record(&CompletionUsage::new(1_000_000, 0));
        assert!(approx(tracker.cost(), 2.5));

        tracker.record(&CompletionUsage::new(0, 1_000_000));
        assert!(approx(tracker.cost(), 2.5 + 10.0));
        assert_eq!(tracker.prompt_tokens(), 1_000_000);
        assert_eq!(tracker.completion_tokens(), 1_000_000);
    }

    #[test]
    fn unknown_model_uses_default_price() {
        let mut tracker = CostTracker::for_model(&Model::Custom("mystery".to_string()), 1.0);
        tracker.record(&CompletionUsage::new(2_000_000, 0));
        assert!(approx(tracker.cost(), 5.0));
    }

    #[test]
    fn empty_session_costs_nothing() {
        let tracker = CostTracker::new(DEFAULT_PROMPT_PRICE, 4.0);
        assert_eq!(tracker.cost(), 0.0);
        assert_eq!(format_session_cost(tracker.cost()), None);
    }

    #[test]
    fn cost_formatting_thresholds() {
        assert_eq!(format_session_cost(1.234), Some("$1.23".to_string()));
        assert_eq!(format_session_cost(0.01), Some("$0.01".to_string()));
        assert_eq!(format_session_cost(0.00456), Some("$0.0046".to_string()));
        assert_eq!(format_session_cost(0.0001), None);
        assert_eq!(format_session_cost(0.00005), None);
    }
}
