//! Cap on the open notional of an account's orders.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::clients::MarketDataClient;
use crate::domain::compliance::{
    ComplianceError, ComplianceParameter, ComplianceRule, ComplianceRuleSchema, ComplianceValue,
};
use crate::domain::order_execution::{
    ExecutionReport, Order, OrderFields, OrderType, ReportInbox, Side,
};
use crate::domain::reference_data::Region;
use crate::domain::shared::{CurrencyId, Money, OrderId, Quantity, Security};

/// Schema name of [`BuyingPowerComplianceRule`].
pub const BUYING_POWER_NAME: &str = "buying_power";

/// Default schema of [`BuyingPowerComplianceRule`].
#[must_use]
pub fn buying_power_schema() -> ComplianceRuleSchema {
    ComplianceRuleSchema::new(
        BUYING_POWER_NAME,
        vec![
            ComplianceParameter::new("currency", CurrencyId::new("USD")),
            ComplianceParameter::new("buying_power", Money::ZERO),
            ComplianceParameter::new(
                "symbols",
                ComplianceValue::List(vec![Security::any().into()]),
            ),
        ],
    )
}

#[derive(Debug, Clone, Copy)]
struct OpenOrder {
    remaining: Quantity,
    price: Money,
}

/// Open quantity and expected price of every tracked order.
#[derive(Debug, Default)]
struct BuyingPowerTracker {
    orders: HashMap<OrderId, OpenOrder>,
}

impl BuyingPowerTracker {
    fn used(&self) -> Money {
        self.orders.values().fold(Money::ZERO, |total, order| {
            total.saturating_add(order.price * order.remaining)
        })
    }

    fn submit(&mut self, id: OrderId, quantity: Quantity, price: Money) -> Money {
        self.orders.insert(
            id,
            OpenOrder {
                remaining: quantity,
                price,
            },
        );
        self.used()
    }

    fn update(&mut self, report: &ExecutionReport) {
        if report.status.is_terminal() {
            self.orders.remove(&report.id);
            return;
        }
        if let Some(order) = self.orders.get_mut(&report.id) {
            let remaining = order.remaining - report.last_quantity;
            order.remaining = remaining.max(Quantity::ZERO);
        }
    }
}

/// Rejects a submission that would take the open notional of tracked orders
/// above `buying_power`.
///
/// Orders are priced at their limit price clamped against the BBO, market
/// orders at the opposite side of the BBO. Only orders on `securities` and
/// denominated in `currency` are tracked.
pub struct BuyingPowerComplianceRule {
    currency: CurrencyId,
    buying_power: Money,
    securities: Region,
    market_data: Arc<dyn MarketDataClient>,
    tracker: Mutex<BuyingPowerTracker>,
    reports: ReportInbox<()>,
}

impl BuyingPowerComplianceRule {
    /// Create the rule. An empty `securities` region means every security.
    #[must_use]
    pub fn new(
        currency: CurrencyId,
        buying_power: Money,
        securities: Region,
        market_data: Arc<dyn MarketDataClient>,
    ) -> Self {
        let securities = if securities.is_empty() {
            Region::global()
        } else {
            securities
        };
        Self {
            currency,
            buying_power,
            securities,
            market_data,
            tracker: Mutex::new(BuyingPowerTracker::default()),
            reports: ReportInbox::new(),
        }
    }

    /// Open notional currently counted against the buying power.
    #[must_use]
    pub fn used_buying_power(&self) -> Money {
        let mut tracker = self.tracker.lock();
        self.settle(&mut tracker);
        tracker.used()
    }

    fn settle(&self, tracker: &mut BuyingPowerTracker) {
        for ((), report) in self.reports.drain() {
            tracker.update(&report);
        }
    }

    fn expected_price(&self, fields: &OrderFields) -> Result<Money, ComplianceError> {
        if fields.order_type == OrderType::Limit && !fields.price.is_positive() {
            return Err(ComplianceError::rejected("Invalid price."));
        }
        let bbo = self
            .market_data
            .load_bbo_quote(&fields.security)
            .ok_or_else(|| ComplianceError::rejected("No BBO quote available."))?;
        Ok(match (fields.order_type, fields.side) {
            (OrderType::Limit, Side::Ask) => bbo.bid.max(fields.price),
            (OrderType::Limit, Side::Bid) => bbo.ask.min(fields.price),
            (_, Side::Ask) => bbo.bid,
            (_, Side::Bid) => bbo.ask,
        })
    }
}

impl ComplianceRule for BuyingPowerComplianceRule {
    fn submit(&self, order: &Order) -> Result<(), ComplianceError> {
        let fields = order.fields();
        if !self.securities.contains_security(&fields.security) {
            return Ok(());
        }
        if fields.currency != self.currency {
            return Err(ComplianceError::rejected("Currency not recognized."));
        }
        let price = self.expected_price(fields)?;
        {
            let mut tracker = self.tracker.lock();
            self.settle(&mut tracker);
            let used = tracker.submit(order.id().clone(), fields.quantity, price);
            if used > self.buying_power {
                tracker.orders.remove(order.id());
                return Err(ComplianceError::rejected(
                    "Order exceeds available buying power.",
                ));
            }
        }
        order.monitor(self.reports.slot(()));
        Ok(())
    }

    fn add(&self, order: &Order) -> Result<(), ComplianceError> {
        let fields = order.fields();
        let tracked = self.securities.contains_security(&fields.security)
            && fields.currency == self.currency;
        if !tracked {
            return Ok(());
        }
        let price = self.expected_price(fields).unwrap_or(fields.price);
        {
            let mut tracker = self.tracker.lock();
            self.settle(&mut tracker);
            tracker.submit(order.id().clone(), fields.quantity, price);
        }
        order.monitor(self.reports.slot(()));
        Ok(())
    }
}

impl std::fmt::Debug for BuyingPowerComplianceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuyingPowerComplianceRule")
            .field("currency", &self.currency)
            .field("buying_power", &self.buying_power)
            .field("securities", &self.securities)
            .finish_non_exhaustive()
    }
}
