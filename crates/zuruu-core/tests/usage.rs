use zuruu_core::models::usage::{ModelPricing, TokenCount, TokenUsage};

#[test]
fn known_family_is_priced() {
    let usage = TokenUsage::new(
        "us.anthropic.claude-sonnet-4-20250514-v1:0",
        TokenCount::new(1_000_000, 100_000),
    );
    let cost = usage.cost_usd.unwrap();
    assert!((cost - 4.5).abs() < 1e-9);
}

#[test]
fn unknown_model_has_no_cost() {
    let usage = TokenUsage::new("scripted", TokenCount::new(10, 10));
    assert_eq!(usage.cost_usd, None);
    assert!(ModelPricing::for_model("amazon.titan-text").is_none());
}

#[test]
fn counts_add_up() {
    let total = TokenCount::new(100, 20) + TokenCount::new(5, 1);
    assert_eq!(total, TokenCount::new(105, 21));
    assert_eq!(total.total(), 126);
}
