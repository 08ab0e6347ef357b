use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{CatalogEntry, Price, SizeCode};
use crate::error::{DomainError, Violation, Violations};
use crate::order::{NewOrder, OrderRef, OrderSelection, OrderStatus};
use crate::ports::{CatalogStore, OrderStore};
use crate::user::User;

/// Amount for `quantity` pizzas of `size`. Zero until a size is chosen.
pub fn quote(
    product: &CatalogEntry,
    size: Option<SizeCode>,
    quantity: u32,
) -> Result<Price, Violation> {
    match size {
        Some(size) => product
            .prices()
            .get(size)
            .checked_times(quantity)
            .ok_or(Violation::AmountTooLarge),
        None => Ok(Price::ZERO),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitState {
    Idle,
    InFlight,
    Submitted(OrderRef),
}

/// One order screen: composes an order for a product and submits it at most
/// once. A submission made while another is in flight is rejected.
pub struct OrderComposition {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    state: Mutex<SubmitState>,
}

/// Resets the composition to idle unless the submission completed.
struct InFlightGuard<'a> {
    state: &'a Mutex<SubmitState>,
    defused: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self, order: OrderRef) {
        *lock(self.state) = SubmitState::Submitted(order);
        self.defused = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.defused {
            *lock(self.state) = SubmitState::Idle;
        }
    }
}

fn lock(state: &Mutex<SubmitState>) -> MutexGuard<'_, SubmitState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl OrderComposition {
    pub fn new(catalog: Arc<dyn CatalogStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            catalog,
            orders,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    /// Load the product the order screen was opened for.
    pub async fn load(&self, product_id: Uuid) -> Result<CatalogEntry, DomainError> {
        Ok(self.catalog.get(product_id).await?)
    }

    /// The order this composition already wrote, if any.
    pub fn submitted(&self) -> Option<OrderRef> {
        match *lock(&self.state) {
            SubmitState::Submitted(order) => Some(order),
            _ => None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        *lock(&self.state) == SubmitState::InFlight
    }

    /// Validate a selection against `product`, reporting every problem at once.
    pub fn build(
        &self,
        user: &User,
        product: &CatalogEntry,
        selection: &OrderSelection,
    ) -> Result<NewOrder, DomainError> {
        let mut violations = Violations::new();

        let size = match selection.size.as_deref().map(str::trim) {
            None | Some("") => {
                violations.push(Violation::SizeMissing);
                None
            }
            Some(raw) => match raw.parse::<SizeCode>() {
                Ok(size) => Some(size),
                Err(violation) => {
                    violations.push(violation);
                    None
                }
            },
        };

        let quantity = u32::try_from(selection.quantity)
            .ok()
            .filter(|q| *q > 0);
        if quantity.is_none() {
            violations.push(Violation::QuantityNotPositive);
        }

        let table_number = selection.table_number.trim();
        if table_number.is_empty() {
            violations.push(Violation::TableNumberMissing);
        }

        let (Some(size), Some(quantity)) = (size, quantity) else {
            return Err(DomainError::Validation(violations));
        };
        let amount = match quote(product, Some(size), quantity) {
            Ok(amount) => amount,
            Err(violation) => {
                violations.push(violation);
                return Err(DomainError::Validation(violations));
            }
        };
        violations.into_result(NewOrder {
            pizza_name: product.name().to_string(),
            size,
            quantity,
            table_number: table_number.to_string(),
            amount,
            status: OrderStatus::Preparing,
            waiter_id: user.id.clone(),
            image_ref: product.image_ref().clone(),
            created_at: Utc::now(),
        })
    }

    /// Build and write the order. Succeeds at most once per composition.
    #[instrument(skip_all, fields(user = %user.id, product = %product.id()))]
    pub async fn submit(
        &self,
        user: &User,
        product: &CatalogEntry,
        selection: &OrderSelection,
    ) -> Result<OrderRef, DomainError> {
        let order = self.build(user, product, selection)?;
        let guard = self.begin()?;

        match self.orders.insert(order).await {
            Ok(id) => {
                let order = OrderRef { id };
                guard.complete(order);
                info!(order_id = %id, "Order submitted");
                Ok(order)
            }
            Err(e) => {
                warn!(error = %e, "Order submission failed");
                Err(DomainError::Persistence(e.to_string()))
            }
        }
    }

    fn begin(&self) -> Result<InFlightGuard<'_>, DomainError> {
        let mut state = lock(&self.state);
        match *state {
            SubmitState::Idle => {
                *state = SubmitState::InFlight;
                Ok(InFlightGuard {
                    state: &self.state,
                    defused: false,
                })
            }
            SubmitState::InFlight => Err(DomainError::SubmissionInFlight),
            SubmitState::Submitted(order) => Err(DomainError::AlreadySubmitted(order.id)),
        }
    }
}
