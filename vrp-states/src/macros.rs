//! Provides some useful macros to avoid repetitive code.

/// A macro to define custom route state on [crate::construction::heuristics::RouteState].
macro_rules! custom_tour_state {
    ($name:ident typeof $type:ty) => {
        paste::paste! {
            #[doc = " Extends [RouteState] within a new ["[<$name TourState>]"]."]
            pub trait [<$name TourState>] {
                #[doc = " Gets `"$name "` tour state."]
                fn [<get_ $name:snake:lower>](&self) -> Option<&$type>;
                #[doc = " Sets `"$name "` tour state."]
                fn [<set_ $name:snake:lower>](&mut self, value: $type);
            }

            // Define a dummy struct type which is used as a key
            struct [<$name TourStateKey>];
            impl [<$name TourState>] for RouteState {
                fn [<get_ $name:snake:lower>](&self) -> Option<&$type> {
                    self.get_tour_state::<[<$name TourStateKey>], _>()
                }

                fn [<set_ $name:snake:lower>](&mut self, value: $type) {
                    self.set_tour_state::<[<$name TourStateKey>], _>(value);
                }
            }
        }
    };
}

/// A macro to define a custom activity state on [crate::construction::heuristics::RouteState].
macro_rules! custom_activity_state {
    ($name:ident typeof $type:ty) => {
        paste::paste! {
            #[doc = " Extends [RouteState] within a new ["[<$name ActivityState>]"]."]
            pub trait [<$name ActivityState>] {
                #[doc = " Gets `"$name "` activity state."]
                fn [<get_ $name:snake:lower _at>](&self, activity_idx: usize) -> Option<&$type>;
                #[doc = " Gets `"$name "` states of all activities."]
                fn [<get_ $name:snake:lower _states>](&self) -> Option<&Vec<$type>>;
                #[doc = " Sets `"$name "` activity states."]
                fn [<set_ $name:snake:lower _states>](&mut self, values: Vec<$type>);
            }

            // Define a dummy struct type which is used as a key.
            struct [<$name ActivityStateKey>];
            impl [<$name ActivityState>] for RouteState {
                fn [<get_ $name:snake:lower _at>](&self, activity_idx: usize) -> Option<&$type> {
                    self.get_activity_state::<[<$name ActivityStateKey>], _>(activity_idx)
                }

                fn [<get_ $name:snake:lower _states>](&self) -> Option<&Vec<$type>> {
                    self.get_activity_states::<[<$name ActivityStateKey>], _>()
                }

                fn [<set_ $name:snake:lower _states>](&mut self, values: Vec<$type>) {
                    self.set_activity_states::<[<$name ActivityStateKey>], _>(values);
                }
            }
        }
    };
}

/// A macro to define a custom state of the route evaluated against specific vehicle type
/// on [crate::construction::heuristics::RouteState].
macro_rules! custom_vehicle_state {
    ($name:ident typeof $type:ty) => {
        paste::paste! {
            #[doc = " Extends [RouteState] within a new ["[<$name VehicleState>]"]."]
            pub trait [<$name VehicleState>] {
                #[doc = " Gets `"$name "` state for the vehicle type."]
                fn [<get_ $name:snake:lower>](&self, type_idx: usize) -> Option<&$type>;
                #[doc = " Sets `"$name "` state for the vehicle type."]
                fn [<set_ $name:snake:lower>](&mut self, type_idx: usize, value: $type);
            }

            // Define a dummy struct type which is used as a key.
            struct [<$name VehicleStateKey>];
            impl [<$name VehicleState>] for RouteState {
                fn [<get_ $name:snake:lower>](&self, type_idx: usize) -> Option<&$type> {
                    self.get_vehicle_state::<[<$name VehicleStateKey>], _>(type_idx)
                }

                fn [<set_ $name:snake:lower>](&mut self, type_idx: usize, value: $type) {
                    self.set_vehicle_state::<[<$name VehicleStateKey>], _>(type_idx, value);
                }
            }
        }
    };
}

/// A macro to define a custom activity state evaluated against specific vehicle type
/// on [crate::construction::heuristics::RouteState].
macro_rules! custom_vehicle_activity_state {
    ($name:ident typeof $type:ty) => {
        paste::paste! {
            #[doc = " Extends [RouteState] within a new ["[<$name VehicleActivityState>]"]."]
            pub trait [<$name VehicleActivityState>] {
                #[doc = " Gets `"$name "` activity state for the vehicle type."]
                fn [<get_ $name:snake:lower _at>](&self, type_idx: usize, activity_idx: usize) -> Option<&$type>;
                #[doc = " Sets `"$name "` activity states for the vehicle type."]
                fn [<set_ $name:snake:lower _states>](&mut self, type_idx: usize, values: Vec<$type>);
            }

            // Define a dummy struct type which is used as a key.
            struct [<$name VehicleActivityStateKey>];
            impl [<$name VehicleActivityState>] for RouteState {
                fn [<get_ $name:snake:lower _at>](&self, type_idx: usize, activity_idx: usize) -> Option<&$type> {
                    self.get_vehicle_activity_state::<[<$name VehicleActivityStateKey>], _>(type_idx, activity_idx)
                }

                fn [<set_ $name:snake:lower _states>](&mut self, type_idx: usize, values: Vec<$type>) {
                    self.set_vehicle_activity_states::<[<$name VehicleActivityStateKey>], _>(type_idx, values);
                }
            }
        }
    };
}
