//! In-memory port implementations
//!
//! Thread-safe test doubles for the catalog, mile ledger, order writer,
//! and notification ports. The ledger debit is a compare-and-decrement
//! under one lock, matching the transactional guarantee of the database
//! adapter.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Mutex;

use core_kernel::{
    CourseId, Currency, DomainPort, GuardianId, Money, OrderId, PortError, ProductId, StudentId,
    TenantContext,
};
use domain_billing::{MaterializedOrder, MileLedgerPort, NotificationPort, OrderWriter};
use domain_catalog::{CatalogPort, CourseDefinition, PricedProduct};

/// In-memory catalog
#[derive(Default)]
pub struct InMemoryCatalog {
    courses: HashMap<CourseId, CourseDefinition>,
    products: HashMap<ProductId, PricedProduct>,
    enrollment_tuition: HashMap<(CourseId, u32), PricedProduct>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a course or pack, along with every product it carries
    pub fn with_course(mut self, course: CourseDefinition) -> Self {
        for item in course.items() {
            self.products.insert(item.product.id, item.product.clone());
        }
        self.courses.insert(course.id(), course);
        self
    }

    /// Registers a standalone product
    pub fn with_product(mut self, product: PricedProduct) -> Self {
        self.products.insert(product.id, product);
        self
    }

    /// Registers the ticket bundle sold for a course at a ticket count
    pub fn with_enrollment_tuition(
        mut self,
        course_id: CourseId,
        ticket_count: u32,
        product: PricedProduct,
    ) -> Self {
        self.enrollment_tuition
            .insert((course_id, ticket_count), product);
        self
    }
}

impl DomainPort for InMemoryCatalog {}

#[async_trait]
impl CatalogPort for InMemoryCatalog {
    async fn find_course(
        &self,
        _tenant: &TenantContext,
        id: CourseId,
    ) -> Result<CourseDefinition, PortError> {
        self.courses
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Course", id))
    }

    async fn find_product(
        &self,
        _tenant: &TenantContext,
        id: ProductId,
    ) -> Result<PricedProduct, PortError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Product", id))
    }

    async fn find_enrollment_tuition_product(
        &self,
        _tenant: &TenantContext,
        course_id: CourseId,
        ticket_count: u32,
    ) -> Result<Option<PricedProduct>, PortError> {
        Ok(self
            .enrollment_tuition
            .get(&(course_id, ticket_count))
            .cloned())
    }
}

/// In-memory mile ledger with an atomic compare-and-decrement debit
pub struct InMemoryMileLedger {
    state: Mutex<LedgerState>,
    yen_per_mile: Decimal,
}

struct LedgerState {
    balances: HashMap<GuardianId, u32>,
    active_contracts: HashMap<GuardianId, u32>,
}

impl InMemoryMileLedger {
    /// Creates a ledger that values each mile at ¥500
    pub fn new() -> Self {
        Self::with_rate(Decimal::new(500, 0))
    }

    /// Creates a ledger with a custom yen-per-mile rate
    pub fn with_rate(yen_per_mile: Decimal) -> Self {
        Self {
            state: Mutex::new(LedgerState {
                balances: HashMap::new(),
                active_contracts: HashMap::new(),
            }),
            yen_per_mile,
        }
    }

    /// Sets a guardian's balance
    pub fn set_balance(&self, guardian: GuardianId, balance: u32) {
        self.state
            .lock()
            .expect("ledger lock poisoned")
            .balances
            .insert(guardian, balance);
    }

    /// Sets a guardian's active contract count
    pub fn set_active_contracts(&self, guardian: GuardianId, count: u32) {
        self.state
            .lock()
            .expect("ledger lock poisoned")
            .active_contracts
            .insert(guardian, count);
    }

    /// Current balance, for assertions
    pub fn balance_of(&self, guardian: GuardianId) -> u32 {
        self.state
            .lock()
            .expect("ledger lock poisoned")
            .balances
            .get(&guardian)
            .copied()
            .unwrap_or(0)
    }

    /// Compare-and-decrement: fails without mutating when the balance does
    /// not cover the spend
    pub fn debit(&self, guardian: GuardianId, miles: u32) -> Result<(), PortError> {
        let mut state = self.state.lock().expect("ledger lock poisoned");
        let balance = state.balances.get(&guardian).copied().unwrap_or(0);
        if balance < miles {
            return Err(PortError::conflict(format!(
                "mile balance {balance} no longer covers a spend of {miles}"
            )));
        }
        state.balances.insert(guardian, balance - miles);
        Ok(())
    }
}

impl Default for InMemoryMileLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainPort for InMemoryMileLedger {}

#[async_trait]
impl MileLedgerPort for InMemoryMileLedger {
    async fn balance(
        &self,
        _tenant: &TenantContext,
        guardian: GuardianId,
    ) -> Result<u32, PortError> {
        Ok(self.balance_of(guardian))
    }

    async fn can_use_miles(
        &self,
        _tenant: &TenantContext,
        guardian: GuardianId,
    ) -> Result<bool, PortError> {
        let state = self.state.lock().expect("ledger lock poisoned");
        Ok(state.active_contracts.get(&guardian).copied().unwrap_or(0) >= 2)
    }

    async fn discount_for(&self, miles: u32) -> Result<Money, PortError> {
        Ok(Money::new(self.yen_per_mile * Decimal::from(miles), Currency::JPY).truncate_to_unit())
    }
}

/// In-memory order store that debits the shared ledger atomically
pub struct InMemoryOrderStore {
    ledger: std::sync::Arc<InMemoryMileLedger>,
    orders: Mutex<Vec<MaterializedOrder>>,
}

impl InMemoryOrderStore {
    pub fn new(ledger: std::sync::Arc<InMemoryMileLedger>) -> Self {
        Self {
            ledger,
            orders: Mutex::new(Vec::new()),
        }
    }

    /// Everything persisted so far
    pub fn orders(&self) -> Vec<MaterializedOrder> {
        self.orders.lock().expect("order lock poisoned").clone()
    }
}

impl DomainPort for InMemoryOrderStore {}

#[async_trait]
impl OrderWriter for InMemoryOrderStore {
    async fn persist(&self, order: &MaterializedOrder) -> Result<(), PortError> {
        if let Some(debit) = &order.mile_debit {
            self.ledger.debit(debit.guardian_id, debit.miles)?;
        }
        self.orders
            .lock()
            .expect("order lock poisoned")
            .push(order.clone());
        Ok(())
    }
}

/// Notification double that records calls and can be made to fail
#[derive(Default)]
pub struct RecordingNotifier {
    pub fail: bool,
    notified: Mutex<Vec<OrderId>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            notified: Mutex::new(Vec::new()),
        }
    }

    /// Order ids notified so far
    pub fn notified(&self) -> Vec<OrderId> {
        self.notified.lock().expect("notifier lock poisoned").clone()
    }
}

impl DomainPort for RecordingNotifier {}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn order_confirmed(
        &self,
        _tenant: &TenantContext,
        order_id: OrderId,
        _student_id: StudentId,
    ) -> Result<(), PortError> {
        if self.fail {
            return Err(PortError::connection("notification channel down"));
        }
        self.notified
            .lock()
            .expect("notifier lock poisoned")
            .push(order_id);
        Ok(())
    }
}
