#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics/context_test.rs"]
mod context_test;

use crate::models::common::Timestamp;
use crate::models::problem::{Actor, Job};
use crate::models::solution::{Activity, Route};
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type StateValue = Arc<dyn Any + Send + Sync>;

/// Specifies insertion context for route: a route where job is going to be inserted and
/// an actor which is going to serve it. Actor can differ from the route's one when
/// switching to another vehicle is evaluated.
pub struct InsertionContext<'a> {
    /// A route context where job supposed to be inserted.
    pub route_ctx: &'a RouteContext,
    /// A job which being evaluated.
    pub job: &'a Arc<Job>,
    /// An actor which serves the route after insertion.
    pub actor: &'a Arc<Actor>,
    /// A departure time of the actor from the route's start.
    pub departure: Timestamp,
}

impl<'a> InsertionContext<'a> {
    /// Creates insertion context which keeps route's actor and departure.
    pub fn new(route_ctx: &'a RouteContext, job: &'a Arc<Job>) -> Self {
        let actor = &route_ctx.route().actor;
        Self { route_ctx, job, actor, departure: actor.detail.time.start }
    }
}

/// Specifies insertion context for activity.
pub struct ActivityContext<'a> {
    /// Index of the previous activity in the tour.
    pub index: usize,

    /// Previous activity.
    pub prev: &'a Activity,

    /// Target activity.
    pub target: &'a Activity,

    /// Next activity. It is route's end when target is inserted last.
    pub next: &'a Activity,

    /// Departure time from the previous activity.
    pub departure: Timestamp,
}

/// Provides the way to associate arbitrary data within route and its activities.
///
/// Values are stored in scopes: tour (route), activity (by tour index), vehicle (route evaluated
/// for a vehicle type index) and vehicle activity. The store is a plain cache: it is not
/// invalidated when route changes, see [`RouteContext::is_stale`].
#[derive(Clone, Default)]
pub struct RouteState {
    index: FxHashMap<TypeId, StateValue>,
    vehicle_index: FxHashMap<(TypeId, usize), StateValue>,
}

impl RouteState {
    /// Gets a value associated with the tour using `K` type as a key.
    pub fn get_tour_state<K: 'static, V: Send + Sync + 'static>(&self) -> Option<&V> {
        self.index.get(&TypeId::of::<K>()).and_then(|any| any.downcast_ref::<V>())
    }

    /// Sets the value associated with the tour using `K` type as a key.
    pub fn set_tour_state<K: 'static, V: Send + Sync + 'static>(&mut self, value: V) {
        self.index.insert(TypeId::of::<K>(), Arc::new(value));
    }

    /// Gets value associated with a key converted to a given type.
    pub fn get_activity_state<K: 'static, V: Send + Sync + 'static>(&self, activity_idx: usize) -> Option<&V> {
        self.get_activity_states::<K, V>().and_then(|activity_states| activity_states.get(activity_idx))
    }

    /// Gets values associated with key and activities.
    pub fn get_activity_states<K: 'static, V: Send + Sync + 'static>(&self) -> Option<&Vec<V>> {
        self.index.get(&TypeId::of::<K>()).and_then(|s| s.downcast_ref::<Vec<V>>())
    }

    /// Adds values associated with activities. Values are indexed the same way as tour activities.
    pub fn set_activity_states<K: 'static, V: Send + Sync + 'static>(&mut self, values: Vec<V>) {
        self.index.insert(TypeId::of::<K>(), Arc::new(values));
    }

    /// Gets a value of the route evaluated for the vehicle type.
    pub fn get_vehicle_state<K: 'static, V: Send + Sync + 'static>(&self, type_idx: usize) -> Option<&V> {
        self.vehicle_index.get(&(TypeId::of::<K>(), type_idx)).and_then(|any| any.downcast_ref::<V>())
    }

    /// Sets a value of the route evaluated for the vehicle type.
    pub fn set_vehicle_state<K: 'static, V: Send + Sync + 'static>(&mut self, type_idx: usize, value: V) {
        self.vehicle_index.insert((TypeId::of::<K>(), type_idx), Arc::new(value));
    }

    /// Gets an activity value evaluated for the vehicle type.
    pub fn get_vehicle_activity_state<K: 'static, V: Send + Sync + 'static>(
        &self,
        type_idx: usize,
        activity_idx: usize,
    ) -> Option<&V> {
        self.vehicle_index
            .get(&(TypeId::of::<K>(), type_idx))
            .and_then(|any| any.downcast_ref::<Vec<V>>())
            .and_then(|activity_states| activity_states.get(activity_idx))
    }

    /// Sets activity values evaluated for the vehicle type.
    pub fn set_vehicle_activity_states<K: 'static, V: Send + Sync + 'static>(
        &mut self,
        type_idx: usize,
        values: Vec<V>,
    ) {
        self.vehicle_index.insert((TypeId::of::<K>(), type_idx), Arc::new(values));
    }

    /// Clear all states.
    pub fn clear(&mut self) {
        self.index.clear();
        self.vehicle_index.clear();
    }

    /// Returns true if no state is stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty() && self.vehicle_index.is_empty()
    }
}

/// Specifies route context: a route within its state.
pub struct RouteContext {
    route: Route,
    state: RouteState,
    cache: RouteCache,
}

struct RouteCache {
    is_stale: bool,
}

impl RouteContext {
    /// Creates a new instance of `RouteContext` with an empty route.
    pub fn new(actor: Arc<Actor>) -> Self {
        Self::new_with_state(Route::new(actor), RouteState::default())
    }

    /// Creates a new instance of `RouteContext` with arguments provided.
    pub fn new_with_state(route: Route, state: RouteState) -> Self {
        RouteContext { route, state, cache: RouteCache { is_stale: true } }
    }

    /// Creates a deep copy of `RouteContext`.
    pub fn deep_copy(&self) -> Self {
        Self {
            route: self.route.deep_copy(),
            state: self.state.clone(),
            cache: RouteCache { is_stale: self.cache.is_stale },
        }
    }

    /// Returns a reference to route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Returns a reference to state.
    pub fn state(&self) -> &RouteState {
        &self.state
    }

    /// Returns mutable reference to used `Route`.
    /// Calling this method marks context as stale.
    pub fn route_mut(&mut self) -> &mut Route {
        self.mark_stale(true);
        &mut self.route
    }

    /// Returns mutable reference to used `RouteState`.
    pub fn state_mut(&mut self) -> &mut RouteState {
        &mut self.state
    }

    /// Returns true if route was changed after its state was recalculated: such state must not
    /// be trusted.
    pub fn is_stale(&self) -> bool {
        self.cache.is_stale
    }

    /// Marks context stale or fresh.
    pub(crate) fn mark_stale(&mut self, is_stale: bool) {
        self.cache.is_stale = is_stale;
    }
}

impl Debug for RouteContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteContext")
            .field("route", &self.route)
            .field("is_stale", &self.is_stale())
            .finish_non_exhaustive()
    }
}
