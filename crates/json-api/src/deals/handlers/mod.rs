//! Deal Handlers

pub(crate) mod active;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
pub(crate) mod tests {
    use jiff::{Timestamp, ToSpan};
    use storefront_app::domain::deals::models::{Deal, DealUuid};
    use storefront_core::deals::{DealDiscount, DealScope, DealStatus, DealWindow};
    use testresult::TestResult;

    /// An active 20% deal that started an hour before `now` and ends 50 hours after it.
    pub(crate) fn make_deal(uuid: DealUuid, now: Timestamp) -> TestResult<Deal> {
        Ok(Deal {
            uuid,
            title: "Spring sale".to_string(),
            description: None,
            discount: DealDiscount::Percentage {
                percentage: 20,
                max_discount_amount: Some(1_500),
            },
            min_purchase_amount: None,
            window: DealWindow {
                status: DealStatus::Active,
                start: now.checked_sub(1.hour())?,
                end: now.checked_add(50.hours())?,
            },
            scope: DealScope::default(),
            created_at: now,
            updated_at: now,
        })
    }
}
