use serde::Serialize;

/// Subscription plan as sold. Static configuration, not storage; the
/// `price_id` points at the hosted payment catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Plan {
    pub key: &'static str,
    pub name: &'static str,
    pub price_usd: u32,
    pub tokens: i64,
    pub price_id: Option<&'static str>,
    pub features: &'static [&'static str],
}

pub const PLANS: &[Plan] = &[
    Plan {
        key: "free",
        name: "Free",
        price_usd: 0,
        tokens: 10_000,
        price_id: None,
        features: &["10K tokens/month", "Basic support", "Basic widget"],
    },
    Plan {
        key: "starter",
        name: "Starter",
        price_usd: 19,
        tokens: 150_000,
        price_id: Some("price_1RdfNTP1x2coidHcaMps3STo"),
        features: &["150K tokens/month", "Email support", "Customizable widget"],
    },
    Plan {
        key: "pro",
        name: "Pro",
        price_usd: 49,
        tokens: 500_000,
        price_id: Some("price_1RdfO7P1x2coidHcPT71SJlt"),
        features: &[
            "500K tokens/month",
            "Priority support",
            "Advanced analytics",
            "Integrations",
        ],
    },
    Plan {
        key: "ultra",
        name: "Ultra",
        price_usd: 99,
        tokens: 1_200_000,
        price_id: Some("price_1RdfOfP1x2coidHcln5m4KEi"),
        features: &[
            "1.2M tokens/month",
            "24/7 support",
            "Custom API",
            "Dedicated onboarding",
        ],
    },
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TokenPack {
    pub key: &'static str,
    pub name: &'static str,
    pub price_usd: u32,
    pub tokens: i64,
    pub price_id: &'static str,
}

pub const TOKEN_PACKS: &[TokenPack] = &[
    TokenPack {
        key: "pack1",
        name: "150K Tokens",
        price_usd: 5,
        tokens: 150_000,
        price_id: "price_1RdfS0P1x2coidHcafwMvRba",
    },
    TokenPack {
        key: "pack2",
        name: "400K Tokens",
        price_usd: 10,
        tokens: 400_000,
        price_id: "price_1RdfT4P1x2coidHcbpqY6Wjh",
    },
];

pub fn plan_by_key(key: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|plan| plan.key == key)
}

/// Look a plan up by the name stored on a subscription row. Stored names
/// vary in casing ("Free", "free"), so the match is case-insensitive.
pub fn plan_for_name(name: &str) -> Option<&'static Plan> {
    let lowered = name.to_lowercase();
    PLANS
        .iter()
        .find(|plan| plan.key == lowered || plan.name.to_lowercase() == lowered)
}

pub fn token_pack_by_key(key: &str) -> Option<&'static TokenPack> {
    TOKEN_PACKS.iter().find(|pack| pack.key == key)
}

/// Consumed share of the plan quota as a percentage. Unknown plans and
/// over-quota balances clamp to the 0..=100 range.
pub fn token_usage_percentage(plan_name: &str, tokens_remaining: i64) -> f64 {
    let Some(plan) = plan_for_name(plan_name) else {
        return 0.0;
    };
    if plan.tokens <= 0 {
        return 0.0;
    }
    let consumed = (plan.tokens - tokens_remaining) as f64;
    (consumed / plan.tokens as f64 * 100.0).clamp(0.0, 100.0)
}
