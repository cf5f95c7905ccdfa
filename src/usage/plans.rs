//! Savings plan usage (`/usage/plans`).
//!
//! Unlike the usage documents this endpoint has a stable shape, so it decodes
//! into typed records. Every field decodes leniently: a `null` or a value of
//! the wrong type takes the field's zero value. Flat columns read the first
//! flavor, period,
//! subscription and flat-fee detail only; the full `flavors` array stays
//! available as a raw column.

use super::numeric::{
    lenient_f64, lenient_i64, lenient_opt_string, lenient_or_default, lenient_string,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsagePlanDocument {
    #[serde(deserialize_with = "lenient_string")]
    pub project_id: String,
    #[serde(deserialize_with = "lenient_or_default")]
    pub period: Period,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total_savings: PlanPrice,
    #[serde(deserialize_with = "lenient_or_default")]
    pub flavors: Vec<FlavorUsage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub from: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanPrice {
    #[serde(deserialize_with = "lenient_string")]
    pub currency_code: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub price_in_ucents: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlavorUsage {
    #[serde(deserialize_with = "lenient_string")]
    pub flavor: String,
    #[serde(deserialize_with = "lenient_or_default")]
    pub fees: FlavorFees,
    #[serde(deserialize_with = "lenient_or_default")]
    pub periods: Vec<UsagePeriod>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub subscriptions: Vec<PlanSubscription>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlavorFees {
    #[serde(deserialize_with = "lenient_or_default")]
    pub flat_fee: FlatFee,
    #[serde(deserialize_with = "lenient_or_default")]
    pub over_quota: OverQuota,
    #[serde(deserialize_with = "lenient_or_default")]
    pub saved_amount: PlanPrice,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total_price: PlanPrice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatFee {
    #[serde(deserialize_with = "lenient_or_default")]
    pub details: Vec<FlatFeeDetail>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total_price: PlanPrice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatFeeDetail {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_or_default")]
    pub period: Period,
    #[serde(deserialize_with = "lenient_string")]
    pub plan_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub size: i64,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total_price: PlanPrice,
    #[serde(deserialize_with = "lenient_or_default")]
    pub unit_price: PlanPrice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverQuota {
    #[serde(deserialize_with = "lenient_or_default")]
    pub ids: Vec<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: i64,
    #[serde(deserialize_with = "lenient_or_default")]
    pub total_price: PlanPrice,
    #[serde(deserialize_with = "lenient_or_default")]
    pub unit_price: PlanPrice,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsagePeriod {
    #[serde(deserialize_with = "lenient_or_default")]
    pub plans_ids: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub begin: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    pub consumption_size: i64,
    #[serde(deserialize_with = "lenient_string")]
    pub coverage: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub cumul_plan_size: i64,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub end: Option<String>,
    #[serde(deserialize_with = "lenient_or_default")]
    pub resource_ids: Vec<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub utilization: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSubscription {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub begin: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub end: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub size: i64,
}

impl UsagePlanDocument {
    /// Decode a payload and stamp the project it was fetched for.
    pub fn from_value(value: Value, project_id: &str) -> serde_json::Result<Self> {
        let mut doc: UsagePlanDocument = if value.is_null() {
            Self::default()
        } else {
            serde_json::from_value(value)?
        };
        doc.project_id = project_id.to_string();
        Ok(doc)
    }

    pub fn first_flavor(&self) -> Option<&FlavorUsage> {
        self.flavors.first()
    }

    pub fn first_period(&self) -> Option<&UsagePeriod> {
        self.first_flavor().and_then(|f| f.periods.first())
    }

    pub fn first_subscription(&self) -> Option<&PlanSubscription> {
        self.first_flavor().and_then(|f| f.subscriptions.first())
    }

    pub fn first_flat_fee_detail(&self) -> Option<&FlatFeeDetail> {
        self.first_flavor().and_then(|f| f.fees.flat_fee.details.first())
    }

    pub fn flavor_name(&self) -> Option<&str> {
        self.first_flavor().map(|f| f.flavor.as_str())
    }

    pub fn flat_fee_total_price(&self) -> Option<f64> {
        self.first_flavor().map(|f| f.fees.flat_fee.total_price.value)
    }

    pub fn flat_fee_currency(&self) -> Option<&str> {
        self.first_flavor()
            .map(|f| f.fees.flat_fee.total_price.currency_code.as_str())
    }

    pub fn over_quota_quantity(&self) -> Option<i64> {
        self.first_flavor().map(|f| f.fees.over_quota.quantity)
    }

    pub fn over_quota_unit_price(&self) -> Option<f64> {
        self.first_flavor().map(|f| f.fees.over_quota.unit_price.value)
    }

    pub fn flavor_total_price(&self) -> Option<f64> {
        self.first_flavor().map(|f| f.fees.total_price.value)
    }

    pub fn flavor_saved_amount(&self) -> Option<f64> {
        self.first_flavor().map(|f| f.fees.saved_amount.value)
    }

    pub fn coverage(&self) -> Option<&str> {
        self.first_period().map(|p| p.coverage.as_str())
    }

    pub fn utilization(&self) -> Option<&str> {
        self.first_period().map(|p| p.utilization.as_str())
    }

    pub fn consumption_size(&self) -> Option<i64> {
        self.first_period().map(|p| p.consumption_size)
    }

    pub fn cumul_plan_size(&self) -> Option<i64> {
        self.first_period().map(|p| p.cumul_plan_size)
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.first_subscription().map(|s| s.id.as_str())
    }

    pub fn subscription_size(&self) -> Option<i64> {
        self.first_subscription().map(|s| s.size)
    }

    pub fn subscription_begin(&self) -> Option<&str> {
        self.first_subscription().and_then(|s| s.begin.as_deref())
    }

    pub fn subscription_end(&self) -> Option<&str> {
        self.first_subscription().and_then(|s| s.end.as_deref())
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.first_flat_fee_detail().map(|d| d.plan_name.as_str())
    }
}
