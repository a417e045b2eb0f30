use serde::Serialize;

/// Fixed price of an individual training or meal plan, in the site's
/// display currency.
pub const PLAN_SERVICE_AMOUNT: i64 = 1000;

/// A membership tier shown on the pricing page. The set is fixed; purchases
/// reference plans by name so clients cannot invent prices.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MembershipPlan {
    pub name: &'static str,
    pub features: &'static [&'static str],
    pub price: &'static str,
}

pub const MEMBERSHIP_PLANS: &[MembershipPlan] = &[
    MembershipPlan {
        name: "Basic",
        features: &[
            "Cardio zone access",
            "Gym floor access",
            "Coach consultation once a month",
            "Group classes twice a week",
        ],
        price: "1500₽",
    },
    MembershipPlan {
        name: "Standard",
        features: &[
            "Cardio zone access",
            "Gym floor access",
            "Martial arts zone access",
            "Coach consultation twice a month",
            "Group classes four times a week",
        ],
        price: "2500₽",
    },
    MembershipPlan {
        name: "Premium",
        features: &[
            "Cardio zone access",
            "Gym floor access",
            "Martial arts zone access",
            "Pool and sauna access",
            "Coach consultation three times a month",
            "Group classes six times a week",
        ],
        price: "5000₽",
    },
];

pub fn find_plan(name: &str) -> Option<&'static MembershipPlan> {
    MEMBERSHIP_PLANS.iter().find(|p| p.name == name)
}
