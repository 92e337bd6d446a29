/// Implements [`Reducer`](crate::Reducer) for a root state made of slices.
///
/// Each `field => Variant` pair routes `Action::Variant(action)` to the
/// reducer of `state.field`. Fields not listed are never touched.
///
/// ```ignore
/// #[derive(Clone, Debug, Default)]
/// struct AppState {
///     fields: SliceState<Field, FieldSummary, String>,
/// }
///
/// enum AppAction {
///     Fields(SliceAction<Field, FieldSummary, String>),
/// }
///
/// impl State for AppState {}
///
/// combine_slices!(AppState, AppAction {
///     fields => Fields,
/// });
/// ```
#[macro_export]
macro_rules! combine_slices {
    ($state:ty, $action:ident { $($field:ident => $variant:ident),+ $(,)? }) => {
        impl $crate::Reducer for $state {
            type Action = $action;

            fn reduce(mut self, action: Self::Action) -> Self {
                match action {
                    $(
                        $action::$variant(action) => {
                            self.$field = $crate::Reducer::reduce(self.$field, action);
                        }
                    )+
                }
                self
            }
        }
    };
}
