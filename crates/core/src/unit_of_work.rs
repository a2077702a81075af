// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{HashMap, HashSet};

use pizzeria_audit::Actor;
use pizzeria_domain::{
    AggregateRoot, Entity, EntityKey, EntityKind, Order, OrderPizza, Pizza, Reference,
};
use tracing::debug;
use uuid::Uuid;

use crate::change_set::{ChangeEntry, ChangeSet, TrackedEntry};
use crate::error::CoreError;
use crate::interceptor::{AuditDetailsInterceptor, SaveChangesInterceptor};
use crate::pending::{CommitReceipt, PendingChanges, PendingWrite};
use crate::state::EntityState;

/// An aggregate and the snapshot it is diffed against.
///
/// `original` is `None` until the aggregate has been committed.
#[derive(Debug, Clone)]
struct Tracked<T> {
    current: T,
    original: Option<T>,
}

impl<T: Clone> Tracked<T> {
    const fn added(current: T) -> Self {
        Self {
            current,
            original: None,
        }
    }

    fn attached(current: T) -> Self {
        Self {
            original: Some(current.clone()),
            current,
        }
    }
}

/// Tracks aggregates for one logical operation and prepares their writes.
///
/// A unit of work is short-lived: load or create aggregates, mutate them,
/// call [`UnitOfWork::prepare_save`], hand the result to a store, then call
/// [`UnitOfWork::accept_changes`] with the store's receipt. After a failed
/// commit the unit should be discarded and the operation retried from a
/// fresh read.
pub struct UnitOfWork {
    pizzas: Vec<Tracked<Pizza>>,
    orders: Vec<Tracked<Order>>,
    interceptors: Vec<Box<dyn SaveChangesInterceptor>>,
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("pizzas", &self.pizzas.len())
            .field("orders", &self.orders.len())
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

impl Default for UnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfWork {
    /// Creates an empty unit of work with the audit interceptor registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pizzas: Vec::new(),
            orders: Vec::new(),
            interceptors: vec![Box::new(AuditDetailsInterceptor)],
        }
    }

    /// Registers an additional interceptor. Interceptors run in
    /// registration order, after the audit interceptor.
    pub fn add_interceptor<I>(&mut self, interceptor: I)
    where
        I: SaveChangesInterceptor + 'static,
    {
        self.interceptors.push(Box::new(interceptor));
    }

    /// Tracks a pizza that has never been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if a pizza with the same id is already tracked.
    pub fn add_pizza(&mut self, pizza: Pizza) -> Result<(), CoreError> {
        self.ensure_untracked(pizza.key())?;
        self.pizzas.push(Tracked::added(pizza));
        Ok(())
    }

    /// Tracks a pizza loaded from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if a pizza with the same id is already tracked.
    pub fn attach_pizza(&mut self, pizza: Pizza) -> Result<(), CoreError> {
        self.ensure_untracked(pizza.key())?;
        self.pizzas.push(Tracked::attached(pizza));
        Ok(())
    }

    /// Tracks an order that has never been persisted.
    ///
    /// # Errors
    ///
    /// Returns an error if an order with the same id is already tracked.
    pub fn add_order(&mut self, order: Order) -> Result<(), CoreError> {
        self.ensure_untracked(order.key())?;
        self.orders.push(Tracked::added(order));
        Ok(())
    }

    /// Tracks an order loaded from storage, line items included.
    ///
    /// # Errors
    ///
    /// Returns an error if an order with the same id is already tracked.
    pub fn attach_order(&mut self, order: Order) -> Result<(), CoreError> {
        self.ensure_untracked(order.key())?;
        self.orders.push(Tracked::attached(order));
        Ok(())
    }

    #[must_use]
    pub fn pizza(&self, id: Uuid) -> Option<&Pizza> {
        self.pizzas
            .iter()
            .map(|tracked| &tracked.current)
            .find(|pizza| pizza.id() == id)
    }

    pub fn pizza_mut(&mut self, id: Uuid) -> Option<&mut Pizza> {
        self.pizzas
            .iter_mut()
            .map(|tracked| &mut tracked.current)
            .find(|pizza| pizza.id() == id)
    }

    #[must_use]
    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders
            .iter()
            .map(|tracked| &tracked.current)
            .find(|order| order.id() == id)
    }

    pub fn order_mut(&mut self, id: Uuid) -> Option<&mut Order> {
        self.orders
            .iter_mut()
            .map(|tracked| &mut tracked.current)
            .find(|order| order.id() == id)
    }

    /// Diffs every tracked aggregate against its snapshot.
    ///
    /// Line items are reported individually. Interceptors have not run, so
    /// a root whose only change is in its children is still reported as
    /// unchanged here.
    pub fn detect_changes(&mut self) -> Vec<ChangeEntry> {
        build_change_set(&mut self.pizzas, &mut self.orders).summaries()
    }

    /// Returns `true` if anything would be written by a save.
    pub fn has_changes(&mut self) -> bool {
        self.detect_changes()
            .iter()
            .any(|entry| entry.state.is_changed())
    }

    /// Runs change detection and every interceptor, then returns the writes
    /// the store must apply atomically.
    pub fn prepare_save(&mut self, actor: &Actor) -> PendingChanges {
        let Self {
            pizzas,
            orders,
            interceptors,
        } = self;

        let states: HashMap<EntityKey, EntityState> = {
            let mut changes: ChangeSet<'_> = build_change_set(pizzas, orders);
            for interceptor in &*interceptors {
                interceptor.saving_changes(&mut changes, actor);
            }
            changes
                .entries()
                .iter()
                .map(|entry| (entry.key(), entry.state()))
                .collect()
        };
        let state_of = |key: EntityKey| -> EntityState {
            states.get(&key).copied().unwrap_or(EntityState::Unchanged)
        };

        let mut writes: Vec<PendingWrite> = Vec::new();

        for tracked in &*pizzas {
            let pizza: &Pizza = &tracked.current;
            match state_of(pizza.key()) {
                EntityState::Added => writes.push(PendingWrite::InsertPizza(pizza.clone())),
                EntityState::Modified => writes.push(PendingWrite::UpdatePizza {
                    pizza: pizza.clone(),
                    expected_version: pizza.version(),
                }),
                EntityState::Unchanged | EntityState::Deleted => {}
            }
        }

        for tracked in &*orders {
            let order: &Order = &tracked.current;
            match state_of(order.key()) {
                EntityState::Added => writes.push(PendingWrite::InsertOrder(order.clone())),
                EntityState::Modified => writes.push(PendingWrite::UpdateOrder {
                    order: order.clone(),
                    expected_version: order.version(),
                }),
                EntityState::Unchanged | EntityState::Deleted => {}
            }

            for line in order.pizzas() {
                match state_of(line.key()) {
                    EntityState::Added => {
                        writes.push(PendingWrite::InsertOrderPizza(line.clone()));
                    }
                    EntityState::Modified => {
                        writes.push(PendingWrite::UpdateOrderPizza(line.clone()));
                    }
                    EntityState::Unchanged | EntityState::Deleted => {}
                }
            }

            if let Some(original) = &tracked.original {
                for line in original.pizzas() {
                    if state_of(line.key()) == EntityState::Deleted {
                        writes.push(PendingWrite::DeleteOrderPizza { id: line.id() });
                    }
                }
            }
        }

        debug!(
            actor = %actor,
            writes = writes.len(),
            "Prepared pending changes"
        );
        PendingChanges::new(writes)
    }

    /// Adopts the committed versions and takes a fresh snapshot of every
    /// tracked aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error, without changing anything, if the receipt names an
    /// aggregate root this unit of work does not track.
    pub fn accept_changes(&mut self, receipt: &CommitReceipt) -> Result<(), CoreError> {
        for (key, _) in receipt.versions() {
            if !self.is_tracked(*key) {
                return Err(CoreError::NotTracked { key: *key });
            }
        }

        for (key, version) in receipt.versions() {
            match key.kind {
                EntityKind::Pizza => {
                    if let Some(pizza) = self.pizza_mut(key.id) {
                        pizza.accept_committed_version(*version);
                    }
                }
                EntityKind::Order => {
                    if let Some(order) = self.order_mut(key.id) {
                        order.accept_committed_version(*version);
                    }
                }
                EntityKind::OrderPizza => {}
            }
        }

        for tracked in &mut self.pizzas {
            tracked.original = Some(tracked.current.clone());
        }
        for tracked in &mut self.orders {
            tracked.original = Some(tracked.current.clone());
        }
        Ok(())
    }

    fn is_tracked(&self, key: EntityKey) -> bool {
        match key.kind {
            EntityKind::Pizza => self.pizza(key.id).is_some(),
            EntityKind::Order => self.order(key.id).is_some(),
            EntityKind::OrderPizza => false,
        }
    }

    fn ensure_untracked(&self, key: EntityKey) -> Result<(), CoreError> {
        if self.is_tracked(key) {
            return Err(CoreError::AlreadyTracked { key });
        }
        Ok(())
    }
}

fn build_change_set<'a>(
    pizzas: &'a mut [Tracked<Pizza>],
    orders: &'a mut [Tracked<Order>],
) -> ChangeSet<'a> {
    let mut entries: Vec<TrackedEntry<'a>> = Vec::new();

    for tracked in pizzas {
        let Tracked { current, original } = tracked;
        let state: EntityState = match original {
            None => EntityState::Added,
            Some(original) if !current.same_state_as(original) => EntityState::Modified,
            Some(_) => EntityState::Unchanged,
        };
        let key: EntityKey = current.key();
        entries.push(TrackedEntry::new(
            key,
            state,
            current.references(),
            Some(current.core_mut()),
        ));
    }

    for tracked in orders {
        push_order_entries(tracked, &mut entries);
    }

    ChangeSet::new(entries)
}

fn push_order_entries<'a>(tracked: &'a mut Tracked<Order>, entries: &mut Vec<TrackedEntry<'a>>) {
    let Tracked { current, original } = tracked;
    let original: Option<&Order> = original.as_ref();

    let order_state: EntityState = match original {
        None => EntityState::Added,
        Some(original) if !current.same_state_as(original) => EntityState::Modified,
        Some(_) => EntityState::Unchanged,
    };
    let order_key: EntityKey = current.key();
    let live_line_ids: HashSet<Uuid> = current.pizzas().iter().map(Entity::id).collect();

    let (core, lines) = current.split_for_tracking();
    entries.push(TrackedEntry::new(
        order_key,
        order_state,
        Vec::new(),
        Some(core),
    ));

    for line in lines {
        let state: EntityState = line_state(line, original);
        let key: EntityKey = line.key();
        let references: Vec<Reference> = line.references();
        entries.push(TrackedEntry::new(
            key,
            state,
            references,
            Some(line.core_mut()),
        ));
    }

    if let Some(original) = original {
        for removed in original
            .pizzas()
            .iter()
            .filter(|line| !live_line_ids.contains(&line.id()))
        {
            entries.push(TrackedEntry::new(
                removed.key(),
                EntityState::Deleted,
                removed.references(),
                None,
            ));
        }
    }
}

fn line_state(line: &OrderPizza, original: Option<&Order>) -> EntityState {
    let snapshot: Option<&OrderPizza> =
        original.and_then(|order| order.pizzas().iter().find(|o| o.id() == line.id()));

    match snapshot {
        None => EntityState::Added,
        Some(snapshot) if !line.same_state_as(snapshot) => EntityState::Modified,
        Some(_) => EntityState::Unchanged,
    }
}
