//! Contact, enquiry and estimate submissions and the emails they produce.

use crate::calculator::currency::format_rupees;
use crate::calculator::painting::{PaintingEstimate, PaintingInput};
use crate::calculator::wood::{WoodEstimate, WoodInput};
use crate::error::{AppError, Result};
use crate::notify::{Message, Notifier};
use crate::validation::{is_blank, is_email, is_phone};
use chrono::{FixedOffset, Utc};
use serde::Deserialize;
use tracing::{info, warn};

const COMPANY_NAME: &str = "Home Glazer";
const TAGLINE: &str = "We Paint Your Imagination";
const COMPANY_ADDRESS: &str = "B-474, Basement, Greenfield Colony, Faridabad, Haryana - 121010";
const COMPANY_PHONE: &str = "+91-9717256514";
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

pub fn service_label(service: &str) -> &str {
    match service {
        "interior" => "Interior Painting",
        "exterior" => "Exterior Painting",
        "texture" => "Texture Painting",
        "stencil" => "Stencil Painting",
        "wood-polish" => "Wood Polishing",
        "wood-coat" => "Wood Coating",
        "carpentry" => "Carpentry Services",
        "complete" => "Complete Renovation",
        other => other,
    }
}

pub fn property_label(property: &str) -> &str {
    match property {
        "apartment" => "Apartment",
        "house" => "House",
        "villa" => "Villa",
        "commercial" => "Commercial Space",
        "office" => "Office",
        "retail" => "Retail Shop",
        "other" => "Other",
        other => other,
    }
}

pub fn timeline_label(timeline: &str) -> &str {
    match timeline {
        "urgent" => "Urgent (ASAP)",
        "1week" => "Within 1 week",
        "2weeks" => "Within 2 weeks",
        "1month" => "Within 1 month",
        "3months" => "Within 3 months",
        "flexible" => "Flexible",
        other => other,
    }
}

pub fn budget_label(budget: &str) -> &str {
    match budget {
        "under25k" => "Under ₹25,000",
        "25-50k" => "₹25,000 - ₹50,000",
        "50-100k" => "₹50,000 - ₹1,00,000",
        "100-200k" => "₹1,00,000 - ₹2,00,000",
        "above200k" => "Above ₹2,00,000",
        "flexible" => "Flexible",
        other => other,
    }
}

fn missing_fields(fields: &[(&str, Option<&str>)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| is_blank(*value))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

fn check_email(email: &str) -> Result<()> {
    if is_email(email.trim()) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid email address".to_string()))
    }
}

fn check_phone(phone: &str) -> Result<()> {
    if is_phone(phone.trim()) {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid phone number".to_string()))
    }
}

fn check_message(message: &str) -> Result<()> {
    if message.chars().count() < 10 {
        return Err(AppError::BadRequest(
            "Message should be at least 10 characters".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: Option<String>,
}

/// The short form on the home page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomepageContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnquiryForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub property: Option<String>,
    pub area: Option<String>,
    pub service: Option<String>,
    pub timeline: Option<String>,
    pub budget: Option<String>,
    pub message: Option<String>,
}

/// Who asked for an estimate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaintingRequest {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(flatten)]
    pub input: PaintingInput,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WoodRequest {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(flatten)]
    pub input: WoodInput,
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}

impl ContactForm {
    pub fn validate(&self) -> Result<()> {
        missing_fields(&[
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
            ("phone", self.phone.as_deref()),
            ("service", self.service.as_deref()),
            ("message", self.message.as_deref()),
        ])?;
        check_email(text(&self.email))?;
        check_phone(text(&self.phone))?;
        check_message(text(&self.message))
    }
}

impl HomepageContactForm {
    pub fn validate(&self) -> Result<()> {
        missing_fields(&[
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
            ("mobile", self.mobile.as_deref()),
            ("message", self.message.as_deref()),
        ])?;
        check_email(text(&self.email))?;
        if !is_phone(text(&self.mobile)) {
            return Err(AppError::BadRequest("Invalid mobile number".to_string()));
        }
        check_message(text(&self.message))
    }
}

impl EnquiryForm {
    pub fn validate(&self) -> Result<()> {
        missing_fields(&[
            ("name", self.name.as_deref()),
            ("email", self.email.as_deref()),
            ("phone", self.phone.as_deref()),
            ("property", self.property.as_deref()),
            ("service", self.service.as_deref()),
        ])?;
        check_email(text(&self.email))?;
        check_phone(text(&self.phone))
    }
}

impl Customer {
    pub fn validate(&self) -> Result<()> {
        missing_fields(&[
            ("fullName", self.full_name.as_deref()),
            ("email", self.email.as_deref()),
        ])?;
        check_email(text(&self.email))?;
        if !is_blank(self.phone.as_deref()) {
            check_phone(text(&self.phone))?;
        }
        Ok(())
    }
}

/// The company copy plus an optional confirmation for the customer.
#[derive(Debug, Clone)]
pub struct Lead {
    pub company: Message,
    pub customer: Option<Message>,
}

/// Sends the company copy first; only that one can fail the request.
pub async fn deliver(notifier: &dyn Notifier, lead: &Lead) -> Result<()> {
    notifier
        .send(&lead.company)
        .await
        .map_err(|e| AppError::Notify(e.to_string()))?;
    info!("Lead delivered: {}", lead.company.subject);

    if let Some(confirmation) = &lead.customer {
        if let Err(e) = notifier.send(confirmation).await {
            warn!("Customer confirmation to {} failed: {}", confirmation.to, e);
        }
    }
    Ok(())
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn submitted_at() -> String {
    let now = Utc::now();
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => now
            .with_timezone(&ist)
            .format("%d/%m/%Y, %I:%M:%S %p IST")
            .to_string(),
        None => now.format("%d/%m/%Y, %I:%M:%S %p UTC").to_string(),
    }
}

/// Label/value rows shared by the HTML and plain-text bodies.
struct Rows(Vec<(String, String)>);

impl Rows {
    fn new() -> Self {
        Rows(Vec::new())
    }

    fn add(&mut self, label: &str, value: impl Into<String>) -> &mut Self {
        self.0.push((label.to_string(), value.into()));
        self
    }

    fn html(&self) -> String {
        self.0
            .iter()
            .map(|(label, value)| {
                format!(
                    "<div class=\"field\"><div class=\"label\">{}:</div><div class=\"value\">{}</div></div>",
                    escape_html(label),
                    escape_html(value).replace('\n', "<br>")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn text(&self) -> String {
        self.0
            .iter()
            .map(|(label, value)| format!("- {label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render(heading: &str, intro: &str, rows: &Rows, footer_note: &str) -> (String, String) {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"></head>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div class="container" style="max-width: 600px; margin: 0 auto;">
      <div class="tagline" style="text-align: center; color: #666; font-style: italic;">{company} - {tagline}</div>
      <div class="header" style="background-color: #299dd7; color: white; padding: 20px; text-align: center;"><h1>{heading}</h1></div>
      <div class="content" style="background-color: #f9f9f9; padding: 20px;">
        <p>{intro}</p>
        {rows}
      </div>
      <div class="footer" style="text-align: center; padding: 20px; color: #666; font-size: 12px;">
        <p><strong>{company}</strong> - {tagline}</p>
        <p>{address}</p>
        <p>Phone: {phone}</p>
        <p style="font-size: 11px; color: #999;">{note}</p>
      </div>
    </div>
  </body>
</html>"#,
        company = COMPANY_NAME,
        tagline = TAGLINE,
        heading = escape_html(heading),
        intro = escape_html(intro),
        rows = rows.html(),
        address = COMPANY_ADDRESS,
        phone = COMPANY_PHONE,
        note = escape_html(footer_note),
    );
    let text = format!(
        "{COMPANY_NAME} - {TAGLINE}\n\n{heading}\n\n{intro}\n\n{}\n\n---\n{footer_note}\n{COMPANY_ADDRESS}\nPhone: {COMPANY_PHONE}\n",
        rows.text()
    );
    (html, text)
}

fn message(to: &str, reply_to: Option<&str>, subject: String, body: (String, String)) -> Message {
    Message {
        to: to.to_string(),
        reply_to: reply_to.map(str::to_string),
        subject,
        html: body.0,
        text: body.1,
    }
}

pub fn contact_lead(form: &ContactForm, inbox: &str) -> Lead {
    let name = text(&form.name);
    let email = text(&form.email);
    let service = service_label(text(&form.service));

    let mut rows = Rows::new();
    rows.add("Name", name)
        .add("Email", email)
        .add("Phone", text(&form.phone))
        .add("Service Required", service)
        .add("Message", text(&form.message));
    let note = format!(
        "This message was submitted through the website contact form. Submitted at: {}",
        submitted_at()
    );
    let company = message(
        inbox,
        Some(email),
        format!("New Contact Message from {name}"),
        render("New Contact Message Received", "Dear HomeGlazer Team,", &rows, &note),
    );

    let mut summary = Rows::new();
    summary
        .add("Service Required", service)
        .add("Your Message", text(&form.message));
    let customer = message(
        email,
        None,
        "Thank You for Contacting Us - Home Glazer".to_string(),
        render(
            "Thank You for Contacting Us!",
            &format!(
                "Dear {name}, thank you for reaching out. We've received your message and will respond within 24 hours."
            ),
            &summary,
            "",
        ),
    );

    Lead {
        company,
        customer: Some(customer),
    }
}

pub fn homepage_contact_lead(form: &HomepageContactForm, inbox: &str) -> Lead {
    let name = text(&form.name);
    let email = text(&form.email);

    let mut rows = Rows::new();
    rows.add("Name", name)
        .add("Email", email)
        .add("Mobile", text(&form.mobile))
        .add("Message", text(&form.message));
    let note = format!(
        "Please follow up with this inquiry at your earliest convenience. Submitted at: {}",
        submitted_at()
    );
    let company = message(
        inbox,
        Some(email),
        format!("New Homepage Inquiry - {name}"),
        render(
            "New Homepage Inquiry",
            "A new inquiry has been received through the homepage contact form:",
            &rows,
            &note,
        ),
    );

    let mut summary = Rows::new();
    summary.add("Your Message", text(&form.message));
    let customer = message(
        email,
        None,
        "Thank You for Contacting Home Glazer".to_string(),
        render(
            "Thank You for Reaching Out!",
            &format!(
                "Dear {name}, thank you for contacting Home Glazer! Our team will get back to you within 24 hours. For immediate assistance, call us at {COMPANY_PHONE}."
            ),
            &summary,
            "",
        ),
    );

    Lead {
        company,
        customer: Some(customer),
    }
}

pub fn enquiry_lead(form: &EnquiryForm, inbox: &str) -> Lead {
    let name = text(&form.name);
    let email = text(&form.email);
    let or_unspecified = |value: &Option<String>, label: fn(&str) -> &str| -> String {
        match text(value) {
            "" => "Not specified".to_string(),
            v => label(v).to_string(),
        }
    };

    let mut rows = Rows::new();
    rows.add("Name", name)
        .add("Email", email)
        .add("Phone", text(&form.phone))
        .add("Property Type", property_label(text(&form.property)))
        .add(
            "Area",
            match text(&form.area) {
                "" => "Not specified".to_string(),
                area => format!("{area} sq.ft"),
            },
        )
        .add("Service Required", service_label(text(&form.service)))
        .add("Timeline", or_unspecified(&form.timeline, timeline_label))
        .add("Budget", or_unspecified(&form.budget, budget_label));
    if !text(&form.message).is_empty() {
        rows.add("Message", text(&form.message));
    }
    let note = format!("Submitted at: {}", submitted_at());
    let company = message(
        inbox,
        Some(email),
        format!("New Enquiry from {name}"),
        render("New Enquiry Received", "A new project enquiry arrived:", &rows, &note),
    );

    let customer = message(
        email,
        None,
        "Thank You for Your Enquiry - Home Glazer".to_string(),
        render(
            "Thank You for Your Enquiry!",
            &format!("Dear {name}, our team will review your requirements and contact you shortly."),
            &rows,
            "",
        ),
    );

    Lead {
        company,
        customer: Some(customer),
    }
}

fn customer_rows(customer: &Customer) -> Rows {
    let mut rows = Rows::new();
    rows.add("Name", text(&customer.full_name))
        .add("Email", text(&customer.email))
        .add("Phone", text(&customer.phone));
    if !text(&customer.service_type).is_empty() {
        rows.add("Service Type", text(&customer.service_type));
    }
    if !text(&customer.location).is_empty() {
        rows.add("Location", text(&customer.location));
    }
    rows
}

pub fn painting_lead(customer: &Customer, estimate: &PaintingEstimate, inbox: &str) -> Lead {
    let name = text(&customer.full_name);
    let email = text(&customer.email);

    let mut rows = customer_rows(customer);
    if let Some(interior) = &estimate.interior {
        rows.add(
            "Interior Work Type",
            interior.work_type.map(|w| w.label()).unwrap_or("Not specified"),
        )
        .add("Interior Area", format!("{} sq.ft", interior.area))
        .add("Wall Paint", interior.wall_paint.clone())
        .add("Wall Paint Cost", format_rupees(interior.wall_cost));
        if let Some(ceiling) = &interior.ceiling_paint {
            rows.add("Ceiling Paint", ceiling.clone())
                .add("Ceiling Paint Cost", format_rupees(interior.ceiling_cost));
        }
        rows.add("Interior Total", interior.total_formatted.clone());
    }
    if let Some(exterior) = &estimate.exterior {
        rows.add(
            "Exterior Work Type",
            exterior.work_type.map(|w| w.label()).unwrap_or("Not specified"),
        )
        .add("Exterior Area", format!("{} sq.ft", exterior.area))
        .add("Exterior Paint", exterior.wall_paint.clone())
        .add("Exterior Paint Cost", format_rupees(exterior.wall_cost));
        if let Some(roof) = &exterior.roof_paint {
            rows.add("Roof Paint", roof.clone())
                .add("Roof Paint Cost", format_rupees(exterior.roof_cost));
        }
        rows.add("Exterior Total", exterior.total_formatted.clone());
    }
    rows.add("Grand Total", estimate.grand_total_formatted.clone());

    let company = message(
        inbox,
        Some(email),
        format!("New Painting Estimate Request - {name}"),
        render(
            "New Painting Estimate Request",
            "A customer requested a painting estimate:",
            &rows,
            &format!("Submitted at: {}", submitted_at()),
        ),
    );
    let customer_copy = message(
        email,
        None,
        "Your Home Glazer Painting Estimate".to_string(),
        render(
            "Your Painting Estimate",
            &format!("Dear {name}, here is the estimate you calculated on our website."),
            &rows,
            "Final pricing is confirmed after a site visit.",
        ),
    );
    Lead {
        company,
        customer: Some(customer_copy),
    }
}

pub fn wood_lead(customer: &Customer, estimate: &WoodEstimate, inbox: &str) -> Lead {
    let name = text(&customer.full_name);
    let email = text(&customer.email);

    let mut rows = customer_rows(customer);
    rows.add("Input Method", estimate.input_method.label());
    if let Some(counts) = &estimate.item_counts {
        rows.add("Doors", counts.doors.to_string())
            .add("Windows", counts.windows.to_string())
            .add("Wall Panels / Wardrobes", counts.wall_panels.to_string())
            .add("Furniture Area", format!("{} sq.ft", counts.furniture_area));
    }
    rows.add("Total Area", format!("{} sq.ft", estimate.total_area))
        .add("Finish Type", estimate.finish_type.clone())
        .add("Finish Brand", estimate.finish_brand.clone())
        .add("Finish", estimate.finish_name.clone())
        .add("Total Estimate", estimate.total_formatted.clone());

    let company = message(
        inbox,
        Some(email),
        format!("New Wood Polishing Estimate Request - {name}"),
        render(
            "New Wood Polishing Estimate Request",
            "A customer requested a wood polishing estimate:",
            &rows,
            &format!("Submitted at: {}", submitted_at()),
        ),
    );
    let customer_copy = message(
        email,
        None,
        "Your Home Glazer Wood Polishing Estimate".to_string(),
        render(
            "Your Wood Polishing Estimate",
            &format!("Dear {name}, here is the estimate you calculated on our website."),
            &rows,
            "Final pricing is confirmed after a site visit.",
        ),
    );
    Lead {
        company,
        customer: Some(customer_copy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MemoryNotifier;

    fn contact() -> ContactForm {
        ContactForm {
            name: Some("Asha".into()),
            email: Some("asha@example.com".into()),
            phone: Some("+91 9876543210".into()),
            service: Some("wood-polish".into()),
            message: Some("Please polish <my> doors".into()),
        }
    }

    #[test]
    fn contact_validation_messages() {
        assert!(contact().validate().is_ok());

        let mut form = contact();
        form.name = None;
        form.phone = Some(" ".into());
        match form.validate() {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Missing required fields: name, phone"),
            other => panic!("unexpected {other:?}"),
        }

        let mut form = contact();
        form.message = Some("too short".into());
        assert!(matches!(form.validate(), Err(AppError::BadRequest(m)) if m.contains("10 characters")));

        let mut form = contact();
        form.phone = Some("12-34".into());
        assert!(matches!(form.validate(), Err(AppError::BadRequest(m)) if m == "Invalid phone number"));
    }

    #[test]
    fn contact_email_uses_display_names_and_escapes() {
        let lead = contact_lead(&contact(), "inbox@example.com");
        assert_eq!(lead.company.to, "inbox@example.com");
        assert_eq!(lead.company.reply_to.as_deref(), Some("asha@example.com"));
        assert_eq!(lead.company.subject, "New Contact Message from Asha");
        assert!(lead.company.html.contains("Wood Polishing"));
        assert!(lead.company.html.contains("&lt;my&gt;"));
        assert!(lead.company.text.contains("- Service Required: Wood Polishing"));
        assert_eq!(lead.customer.unwrap().to, "asha@example.com");
    }

    #[test]
    fn homepage_form_checks_mobile_and_builds_both_emails() {
        let form = HomepageContactForm {
            name: Some("Meera".into()),
            email: Some("meera@example.com".into()),
            mobile: Some("98765 43210".into()),
            message: Some("Need a quote for two rooms".into()),
        };
        assert!(form.validate().is_ok());

        let bad_mobile = HomepageContactForm {
            mobile: Some("123".into()),
            ..form.clone()
        };
        assert!(matches!(bad_mobile.validate(), Err(AppError::BadRequest(m)) if m == "Invalid mobile number"));
        let missing = HomepageContactForm {
            message: None,
            ..form.clone()
        };
        assert!(matches!(missing.validate(), Err(AppError::BadRequest(m)) if m == "Missing required fields: message"));

        let lead = homepage_contact_lead(&form, "inbox@example.com");
        assert_eq!(lead.company.subject, "New Homepage Inquiry - Meera");
        assert_eq!(lead.company.reply_to.as_deref(), Some("meera@example.com"));
        assert!(lead.company.text.contains("- Mobile: 98765 43210"));
        let customer = lead.customer.unwrap();
        assert_eq!(customer.subject, "Thank You for Contacting Home Glazer");
        assert_eq!(customer.to, "meera@example.com");
    }

    #[test]
    fn enquiry_defaults_unspecified_fields() {
        let form = EnquiryForm {
            name: Some("Ravi".into()),
            email: Some("ravi@example.com".into()),
            phone: Some("9876543210".into()),
            property: Some("villa".into()),
            service: Some("complete".into()),
            budget: Some("50-100k".into()),
            ..Default::default()
        };
        assert!(form.validate().is_ok());
        let lead = enquiry_lead(&form, "inbox@example.com");
        assert!(lead.company.text.contains("- Property Type: Villa"));
        assert!(lead.company.text.contains("- Timeline: Not specified"));
        assert!(lead.company.text.contains("- Budget: ₹50,000 - ₹1,00,000"));
        assert!(lead.company.text.contains("- Service Required: Complete Renovation"));
    }

    #[tokio::test]
    async fn customer_failure_does_not_fail_delivery() {
        let notifier = MemoryNotifier::failing_for("asha@example.com");
        let lead = contact_lead(&contact(), "inbox@example.com");
        deliver(&notifier, &lead).await.unwrap();
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn company_failure_fails_delivery() {
        let notifier = MemoryNotifier::failing_for("inbox@example.com");
        let lead = contact_lead(&contact(), "inbox@example.com");
        let err = deliver(&notifier, &lead).await.unwrap_err();
        assert!(matches!(err, AppError::Notify(_)));
    }

    #[test]
    fn painting_request_flattens_customer_and_input() {
        let request: PaintingRequest = serde_json::from_value(serde_json::json!({
            "fullName": "Asha",
            "email": "asha@example.com",
            "paintingType": "interior",
            "area": 2500,
            "areaType": "carpet",
            "interiorPaint": {"category": "premium", "brand": "asian-paints", "type": "22"}
        }))
        .unwrap();
        assert!(request.customer.validate().is_ok());
        let estimate = crate::calculator::painting::estimate(&request.input);
        let lead = painting_lead(&request.customer, &estimate, "inbox@example.com");
        assert_eq!(lead.company.subject, "New Painting Estimate Request - Asha");
        assert!(lead.company.text.contains("Grand Total"));
    }
}
