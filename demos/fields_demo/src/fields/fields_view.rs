use crate::fields::fields_state::{Field, FieldSummary};
use apexrx::{ApiError, CreateView, EntityView, FormField, SummariesView};
use tracing::{debug, info, warn};

fn show_error(error: &Option<ApiError>) {
    if let Some(error) = error {
        warn!("| Error: {}", error.error_message);
    }
}

pub fn show_summaries(view: &SummariesView<FieldSummary>) {
    info!("============ Summaries ============");
    if view.is_loading {
        debug!("| Loading...");
    }
    show_error(&view.error);
    for summary in &view.summaries {
        debug!("| [{}] {}", summary.id, summary.label);
    }
}

pub fn show_entity(view: &EntityView<Field>) {
    info!("============ Entity ===============");
    if view.is_loading {
        debug!("| Loading...");
    }
    show_error(&view.error);
    match &view.entity {
        Some(field) => debug!("| {} ({}): {}", field.label, field.id, field.help_text),
        None => debug!("| No entity loaded."),
    }
}

pub fn show_form(fields: &[FormField]) {
    info!("============ New field ============");
    for field in fields {
        debug!("| {:<10} [{}]", field.label, field.value);
        if let Some(error) = &field.error {
            warn!("|   {}", error);
        }
    }
}

pub fn show_create(view: &CreateView) {
    if view.is_submitting {
        debug!("| Submitting...");
    }
    show_error(&view.error);
}
