use super::{ApiJson, AppState, Done};
use crate::error::Result;
use crate::leads::{self, ContactForm, EnquiryForm, HomepageContactForm};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, instrument};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(contact))
        .route("/api/enquiry", post(enquiry))
        .route("/api/homepage-contact", post(homepage_contact))
}

#[instrument(skip_all)]
async fn contact(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ContactForm>,
) -> Result<Json<Done>> {
    form.validate()?;
    let lead = leads::contact_lead(&form, &state.config.mail.company_inbox);
    leads::deliver(state.notifier.as_ref(), &lead).await?;
    info!("Contact message from {}", form.email.as_deref().unwrap_or_default());
    Ok(Done::new(
        "Message sent successfully. We will get back to you within 24 hours.",
    ))
}

#[instrument(skip_all)]
async fn enquiry(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<EnquiryForm>,
) -> Result<Json<Done>> {
    form.validate()?;
    let lead = leads::enquiry_lead(&form, &state.config.mail.company_inbox);
    leads::deliver(state.notifier.as_ref(), &lead).await?;
    info!("Enquiry from {}", form.email.as_deref().unwrap_or_default());
    Ok(Done::new(
        "Enquiry submitted successfully. We will get back to you within 24 hours.",
    ))
}

#[instrument(skip_all)]
async fn homepage_contact(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<HomepageContactForm>,
) -> Result<Json<Done>> {
    form.validate()?;
    let lead = leads::homepage_contact_lead(&form, &state.config.mail.company_inbox);
    leads::deliver(state.notifier.as_ref(), &lead).await?;
    info!("Homepage inquiry from {}", form.email.as_deref().unwrap_or_default());
    Ok(Done::new(
        "Message sent successfully! We will get back to you within 24 hours.",
    ))
}
