//! Token accounting for provider calls.

use std::ops::Add;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Tokens consumed by one provider call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenCount {
    pub input: u64,
    pub output: u64,
}

impl TokenCount {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }

    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

impl Add for TokenCount {
    type Output = TokenCount;

    fn add(self, other: TokenCount) -> TokenCount {
        TokenCount::new(self.input + other.input, self.output + other.output)
    }
}

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ModelPricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

/// Approximate list prices, matched by substring of the model id. Keep the
/// more specific families first.
const PRICE_LIST: &[(&str, ModelPricing)] = &[
    (
        "claude-opus-4",
        ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        },
    ),
    (
        "claude-sonnet-4",
        ModelPricing {
            input_per_million: 3.0,
            output_per_million: 15.0,
        },
    ),
    (
        "claude-haiku",
        ModelPricing {
            input_per_million: 0.80,
            output_per_million: 4.0,
        },
    ),
];

impl ModelPricing {
    /// Price for `model_id`, if it belongs to a known family.
    pub fn for_model(model_id: &str) -> Option<ModelPricing> {
        PRICE_LIST
            .iter()
            .find(|(family, _)| model_id.contains(family))
            .map(|(_, pricing)| *pricing)
    }

    pub fn cost_of(&self, tokens: TokenCount) -> f64 {
        let per_token = |price: f64| price / 1_000_000.0;
        tokens.input as f64 * per_token(self.input_per_million)
            + tokens.output as f64 * per_token(self.output_per_million)
    }
}

/// What one call consumed and roughly what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TokenUsage {
    pub model_id: String,
    pub tokens: TokenCount,
    /// `None` for models missing from the price list.
    pub cost_usd: Option<f64>,
}

impl TokenUsage {
    pub fn new(model_id: impl Into<String>, tokens: TokenCount) -> Self {
        let model_id = model_id.into();
        let cost_usd = ModelPricing::for_model(&model_id).map(|p| p.cost_of(tokens));
        Self {
            model_id,
            tokens,
            cost_usd,
        }
    }
}
