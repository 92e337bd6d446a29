use crate::config::Config;
use crate::fields::fields_model::FieldsModel;
use crate::fields::fields_state::{field_labels, Field};
use crate::fields::fields_view::{show_create, show_entity, show_form, show_summaries};
use crate::tracing_setup::tracing_init;
use apexrx::{ApexForm, FormErrors, SubmitOutcome};
use futures_signals::signal::SignalExt;
use tracing::{error, info};

mod config;
mod fields;
mod tracing_setup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_init()?;
    let config = Config::load()?;
    info!(endpoint = %config.fields.endpoint, mock = config.fields.mock, "starting");

    let model = FieldsModel::new(&config.fields);

    // Mount: one list fetch and one detail fetch.
    let mut summaries = model.summaries();
    let mut entity = model.entity_by_id("abc");

    for request in [summaries.take_request(), entity.take_request()]
        .into_iter()
        .flatten()
    {
        if let Err(e) = request.await? {
            error!("mount fetch failed: {e}");
        }
    }

    let state = model.store().await_state().await?;
    show_summaries(&summaries.view());
    show_entity(&entity.view());
    info!(loaded = state.fields.entities.len(), "summaries in store");

    tokio::spawn(
        model
            .store()
            .signal_ref(|state| state.fields.create_submitting())
            .dedupe()
            .for_each(|submitting| {
                info!(submitting, "create status");
                async {}
            }),
    );

    let mut form = ApexForm::new(field_labels()).with_validator(|values| {
        let mut errors = FormErrors::new();
        for key in ["id", "label"] {
            if values.get(key).unwrap_or_default().trim().is_empty() {
                errors.insert(key.to_string(), format!("{key} is required"));
            }
        }
        errors
    });
    form.set_value("id", "ghi")?;
    form.set_value("label", "Phone")?;
    form.set_value("helpText", "Where we can reach you")?;
    show_form(&form.fields());

    let creator = model.creator();
    match form.submit(|values| values.parse::<Field>()) {
        SubmitOutcome::Submitted(Ok(field)) => {
            if let Err(e) = creator.create(field).await? {
                error!("create failed: {e}");
            }
            show_create(&creator.view());
        }
        SubmitOutcome::Submitted(Err(e)) => error!("form values do not make a field: {e}"),
        SubmitOutcome::Invalid(_) => show_form(&form.fields()),
    }

    // Created records only show up after a fresh fetch.
    if let Err(e) = model.slice().get_all_summaries(&model.store()).await? {
        error!("refresh failed: {e}");
    }
    show_summaries(&summaries.view());

    model.exit()?;
    model
        .store()
        .to_signal()
        .stop_if(|state| state.exit)
        .for_each(|_| async {})
        .await;
    info!("=================================");
    info!("  Main thread | Finish");
    Ok(())
}
