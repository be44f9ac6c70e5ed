//! Subscription plans and their limits.
//!
//! The plan table is compiled in and never changes at runtime; look limits up
//! with [`PlanLimits::for_plan`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Subscription plan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Entry plan, no payment required.
    #[default]
    Free,
    /// Small stores.
    Basic,
    /// Growing stores with a team.
    Pro,
    /// Multi-location operations.
    Enterprise,
}

impl PlanType {
    /// Every plan, cheapest first.
    pub const ALL: [Self; 4] = [Self::Free, Self::Basic, Self::Pro, Self::Enterprise];

    /// Lowercase identifier used on the wire and in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Basic => "basic",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Limits for this plan.
    #[must_use]
    pub fn limits(&self) -> &'static PlanLimits {
        PlanLimits::for_plan(*self)
    }
}

impl std::fmt::Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "basic" => Ok(Self::Basic),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(format!("invalid plan type: {s}")),
        }
    }
}

/// Support response level included with a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportPriority {
    Low,
    Medium,
    High,
}

impl SupportPriority {
    /// Lowercase name, as serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Usage limits and feature flags of a subscription plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanLimits {
    pub max_vehicles: u32,
    pub max_team_members: u32,
    pub max_customers: u32,
    pub show_advanced_reports: bool,
    pub show_share_link: bool,
    pub support_priority: SupportPriority,
    /// Checkout page for paid plans.
    pub payment_link: Option<&'static str>,
    /// Monthly price in cents.
    #[serde(skip)]
    price_cents: i64,
}

static FREE: PlanLimits = PlanLimits {
    max_vehicles: 10,
    max_team_members: 1,
    max_customers: 50,
    show_advanced_reports: false,
    show_share_link: false,
    support_priority: SupportPriority::Low,
    payment_link: None,
    price_cents: 0,
};

static BASIC: PlanLimits = PlanLimits {
    max_vehicles: 50,
    max_team_members: 3,
    max_customers: 500,
    show_advanced_reports: false,
    show_share_link: true,
    support_priority: SupportPriority::Medium,
    payment_link: Some("https://buy.stripe.com/storedesk-basic"),
    price_cents: 4990,
};

static PRO: PlanLimits = PlanLimits {
    max_vehicles: 200,
    max_team_members: 10,
    max_customers: 5000,
    show_advanced_reports: true,
    show_share_link: true,
    support_priority: SupportPriority::High,
    payment_link: Some("https://buy.stripe.com/storedesk-pro"),
    price_cents: 9990,
};

static ENTERPRISE: PlanLimits = PlanLimits {
    max_vehicles: 1000,
    max_team_members: 50,
    max_customers: 50_000,
    show_advanced_reports: true,
    show_share_link: true,
    support_priority: SupportPriority::High,
    payment_link: Some("https://buy.stripe.com/storedesk-enterprise"),
    price_cents: 29_990,
};

impl PlanLimits {
    /// Look up the limits of a plan.
    #[must_use]
    pub fn for_plan(plan: PlanType) -> &'static Self {
        match plan {
            PlanType::Free => &FREE,
            PlanType::Basic => &BASIC,
            PlanType::Pro => &PRO,
            PlanType::Enterprise => &ENTERPRISE,
        }
    }

    /// Monthly price in the store's currency.
    #[must_use]
    pub fn price(&self) -> Decimal {
        Decimal::new(self.price_cents, 2)
    }

    /// Returns true if the plan requires payment.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        self.price_cents > 0
    }
}

/// Serialized view including the computed price.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanLimitsView<'a> {
    #[serde(flatten)]
    limits: &'a PlanLimits,
    price: Decimal,
}

impl PlanLimits {
    /// JSON representation with `price` as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(PlanLimitsView {
            limits: self,
            price: self.price(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for plan in PlanType::ALL {
            assert_eq!(PlanType::from_str(plan.as_str()).unwrap(), plan);
            assert_eq!(plan.to_string(), plan.as_str());
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!(PlanType::from_str("platinum").is_err());
        assert!(PlanType::from_str("Pro").is_err());
    }

    #[test]
    fn test_limits_grow_with_plan() {
        for pair in PlanType::ALL.windows(2) {
            let [lower, higher] = pair else { continue };
            let (lower, higher) = (lower.limits(), higher.limits());
            assert!(lower.max_vehicles < higher.max_vehicles);
            assert!(lower.max_team_members < higher.max_team_members);
            assert!(lower.max_customers < higher.max_customers);
            assert!(lower.price() < higher.price());
        }
    }

    #[test]
    fn test_only_paid_plans_have_payment_links() {
        for plan in PlanType::ALL {
            let limits = plan.limits();
            assert_eq!(limits.is_paid(), limits.payment_link.is_some());
        }
    }

    #[test]
    fn test_free_plan() {
        let free = PlanLimits::for_plan(PlanType::Free);
        assert_eq!(free.price(), Decimal::ZERO);
        assert!(!free.show_advanced_reports);
        assert_eq!(free.support_priority, SupportPriority::Low);
    }

    #[test]
    fn test_price_is_decimal() {
        assert_eq!(
            PlanType::Basic.limits().price(),
            Decimal::from_str("49.90").unwrap()
        );
    }

    #[test]
    fn test_json_shape() {
        let json = PlanType::Pro.limits().to_json().unwrap();
        assert_eq!(json["maxVehicles"], 200);
        assert_eq!(json["supportPriority"], "high");
        assert_eq!(json["price"], "99.90");
        assert!(json.get("priceCents").is_none());
    }

    #[test]
    fn test_plan_type_serde() {
        assert_eq!(
            serde_json::to_string(&PlanType::Enterprise).unwrap(),
            "\"enterprise\""
        );
    }
}
