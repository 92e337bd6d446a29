pub mod fields_model;
pub mod fields_state;
pub mod fields_view;
