//! # Quote Document
//!
//! Renders a priced quote as a printable, self-contained HTML page.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Company name / slogan / hotline / email / address            [logo]   │
//! │─────────────────────────────────────────────────────────────────────────│
//! │                 SOLAR POWER SYSTEM QUOTATION                            │
//! │                 Date: 16/10/2026 | No: SQ-123456                        │
//! │  Customer block            System overview (kW, panels, kWh)            │
//! │  Line table  # | Category | Code | Name + warranty | Qty | Unit | Total │
//! │  Subtotal / VAT (10%) / TOTAL                                           │
//! │  Estimated savings         Installment options                          │
//! │  Terms                     Signatures                                   │
//! │  Footer: company contact or default contact line                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every caller-supplied string is HTML-escaped. The logo is only embedded
//! when it is a `data:image/` URL.

use chrono::{DateTime, Utc};
use solar_core::{QuoteResult, SavingsEstimate, VAT_RATE};

use crate::config::{non_blank, CompanyProfile};

/// Footer line used when the company has no contact details configured.
pub const DEFAULT_FOOTER_CONTACT: &str =
    "Address: 123 ABC Street, XYZ District, Ho Chi Minh City | Phone: 1900-SOLAR | Email: info@solar.vn";

const TERMS: [&str; 6] = [
    "This quotation is valid for 30 days from the date of issue.",
    "Prices include VAT and standard installation.",
    "Installation takes 3-5 working days after the contract is signed.",
    "Warranty: panels 25 years, inverter 10-12 years, storage battery 10 years.",
    "We handle the utility grid-connection paperwork and required permits.",
    "Payment: 50% on signing the contract, 50% on completion of installation.",
];

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Times New Roman', serif; font-size: 12px; line-height: 1.4; color: #333; }
.container { max-width: 800px; margin: 0 auto; }
.header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 30px; border-bottom: 2px solid #f39c12; padding-bottom: 20px; }
.company-info h1 { color: #f39c12; font-size: 24px; margin-bottom: 5px; }
.company-info p { color: #666; font-style: italic; }
.logo { width: 80px; height: 80px; object-fit: contain; }
.quote-title { text-align: center; margin: 30px 0; color: #2c3e50; }
.quote-title h2 { font-size: 20px; margin-bottom: 10px; text-transform: uppercase; }
.customer-section { margin-bottom: 25px; background: #f8f9fa; padding: 15px; border-radius: 5px; }
.customer-details { display: grid; grid-template-columns: 1fr 1fr; gap: 15px; }
.detail-item { display: flex; justify-content: space-between; padding: 5px 0; border-bottom: 1px dotted #ccc; }
.system-overview { margin-bottom: 25px; padding: 15px; border: 1px solid #27ae60; border-radius: 5px; background: #f1f8e9; }
.system-specs { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; text-align: center; }
.spec-value { font-size: 16px; font-weight: bold; color: #27ae60; }
.quote-table { width: 100%; border-collapse: collapse; margin-bottom: 20px; font-size: 11px; }
.quote-table th, .quote-table td { border: 1px solid #ddd; padding: 8px; text-align: left; }
.quote-table th { background: #f39c12; color: white; text-align: center; }
.quote-table .price { text-align: right; font-weight: bold; }
.total-item { display: flex; justify-content: space-between; padding: 5px 0; border-bottom: 1px dotted #ccc; max-width: 300px; margin-left: auto; }
.total-final { font-size: 16px; font-weight: bold; color: #f39c12; border-bottom: 3px double #f39c12; margin-top: 10px; }
.savings-section { background: #e8f5e8; padding: 15px; border-radius: 5px; margin: 25px 0; border-left: 4px solid #27ae60; }
.savings-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; }
.installment-options { display: grid; grid-template-columns: repeat(3, 1fr); gap: 15px; margin-bottom: 25px; }
.installment-option { text-align: center; padding: 10px; background: #f8f9fa; border-radius: 5px; border: 1px solid #e9ecef; }
.terms-section { background: #fff3cd; padding: 15px; border-radius: 5px; border-left: 4px solid #ffc107; margin-bottom: 25px; }
.terms-list { list-style-type: disc; margin-left: 20px; }
.signature-section { display: grid; grid-template-columns: 1fr 1fr; gap: 50px; margin-top: 40px; text-align: center; }
.signature-line { border-top: 1px solid #333; margin-top: 50px; padding-top: 5px; }
.footer { text-align: center; margin-top: 30px; padding: 20px 0; border-top: 2px solid #f39c12; color: #666; }
@media print { body { -webkit-print-color-adjust: exact; } }
"#;

/// A rendered quote ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    pub filename: String,
    pub html: String,
}

/// Renders `data` as an HTML quotation issued at `issued_at`.
pub fn render_quote(
    data: &QuoteResult,
    savings: &SavingsEstimate,
    company: &CompanyProfile,
    issued_at: DateTime<Utc>,
) -> QuoteDocument {
    let millis = issued_at.timestamp_millis();
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Solar Power System Quotation</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"container\">\n");

    push_header(&mut html, company);
    html.push_str(&format!(
        "<div class=\"quote-title\"><h2>Solar Power System Quotation</h2>\
         <p>Date: {} | No: {}</p></div>\n",
        issued_at.format("%d/%m/%Y"),
        quote_number(millis)
    ));
    push_customer(&mut html, data);
    push_system_overview(&mut html, data);
    push_line_table(&mut html, data);
    push_totals(&mut html, data);
    push_savings(&mut html, savings);
    push_installments(&mut html, data);
    push_terms(&mut html);
    push_footer(&mut html, company);

    html.push_str("</div>\n</body>\n</html>\n");

    QuoteDocument {
        filename: document_filename(&data.customer.name, millis),
        html,
    }
}

/// `SQ-` followed by the last six digits of the issue time in milliseconds.
pub fn quote_number(millis: i64) -> String {
    format!("SQ-{:06}", millis.rem_euclid(1_000_000))
}

/// `Quote_<customer>_<millis>.html`, with the name reduced to letters,
/// digits, `-` and `_`.
pub fn document_filename(customer_name: &str, millis: i64) -> String {
    let mut name: String = customer_name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    if name.is_empty() {
        name.push_str("Customer");
    }
    format!("Quote_{}_{}.html", name, millis)
}

/// Escapes text for use in HTML content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Trims a float to at most two decimals without trailing zeros.
fn format_decimal(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn push_header(html: &mut String, company: &CompanyProfile) {
    html.push_str("<div class=\"header\">\n<div class=\"company-info\">\n");
    html.push_str(&format!(
        "<h1>{}</h1>\n<p>{}</p>\n",
        escape_html(company.display_name()),
        escape_html(company.display_slogan())
    ));

    let contact: Vec<String> = [
        non_blank(&company.phone).map(|p| format!("<span>Hotline: {}</span>", escape_html(p))),
        non_blank(&company.email).map(|e| format!("<span>Email: {}</span>", escape_html(e))),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !contact.is_empty() {
        html.push_str(&format!("<div>{}</div>\n", contact.join(" | ")));
    }
    if let Some(address) = non_blank(&company.address) {
        html.push_str(&format!("<p>Address: {}</p>\n", escape_html(address)));
    }
    html.push_str("</div>\n");

    if let Some(logo) = non_blank(&company.logo_data_url).filter(|l| l.starts_with("data:image/")) {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"Logo\" class=\"logo\">\n",
            escape_html(logo)
        ));
    }
    html.push_str("</div>\n");
}

fn detail(label: &str, value: &str) -> String {
    format!(
        "<div class=\"detail-item\"><span>{}:</span><strong>{}</strong></div>\n",
        label, value
    )
}

fn push_customer(html: &mut String, data: &QuoteResult) {
    let customer = &data.customer;
    html.push_str("<div class=\"customer-section\">\n<h3>CUSTOMER INFORMATION</h3>\n");
    html.push_str("<div class=\"customer-details\">\n<div>\n");
    html.push_str(&detail("Customer name", &escape_html(&customer.name)));
    if let Some(phone) = non_blank(&customer.phone) {
        html.push_str(&detail("Phone", &escape_html(phone)));
    }
    if let Some(address) = non_blank(&customer.address) {
        html.push_str(&detail("Address", &escape_html(address)));
    }
    html.push_str(&detail("Monthly electricity bill", &customer.monthly_bill.to_string()));
    html.push_str(&detail(
        "Monthly consumption",
        &format!("{:.1} kWh", customer.monthly_consumption),
    ));
    html.push_str("</div>\n<div>\n");
    html.push_str(&detail("Savings target", &format!("{}%", customer.savings_percent)));
    html.push_str(&detail(
        "Daytime usage",
        &format!("{:.1} kWh/day", customer.morning_usage),
    ));
    html.push_str(&detail(
        "Evening usage",
        &format!("{:.1} kWh/day", customer.evening_usage),
    ));
    html.push_str("</div>\n</div>\n</div>\n");
}

fn push_system_overview(html: &mut String, data: &QuoteResult) {
    let system = &data.system;
    let (total_power, panels) = system
        .pv
        .as_ref()
        .map(|pv| (pv.total_power, pv.quantity))
        .unwrap_or((0.0, 0));
    let capacity = system.battery.as_ref().map(|b| b.total_capacity).unwrap_or(0.0);

    html.push_str("<div class=\"system-overview\">\n<h3>SYSTEM OVERVIEW</h3>\n<div class=\"system-specs\">\n");
    for (label, value) in [
        ("Total power", format!("{} kW", format_decimal(total_power))),
        ("Panels", format!("{} panels", panels)),
        ("Battery capacity", format!("{} kWh", format_decimal(capacity))),
    ] {
        html.push_str(&format!(
            "<div class=\"spec-item\"><div>{}</div><div class=\"spec-value\">{}</div></div>\n",
            label, value
        ));
    }
    html.push_str("</div>\n</div>\n");
}

fn push_line_table(html: &mut String, data: &QuoteResult) {
    html.push_str(
        "<table class=\"quote-table\">\n<thead><tr>\
         <th>#</th><th>Category</th><th>Code</th><th>Description</th>\
         <th>Qty</th><th>Unit price</th><th>Amount</th>\
         </tr></thead>\n<tbody>\n",
    );
    for (index, item) in data.quote.items.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td style=\"text-align: center;\">{}</td><td>{}</td><td>{}</td>\
             <td>{}<br><small style=\"color: #666;\">Warranty: {}</small></td>\
             <td style=\"text-align: center;\">{} {}</td>\
             <td class=\"price\">{}</td><td class=\"price\">{}</td></tr>\n",
            index + 1,
            item.category,
            escape_html(&item.code),
            escape_html(&item.name),
            escape_html(&item.warranty),
            item.quantity,
            escape_html(&item.unit),
            item.unit_price,
            item.total_price
        ));
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_totals(html: &mut String, data: &QuoteResult) {
    let quote = &data.quote;
    html.push_str("<div class=\"total-section\">\n");
    html.push_str(&format!(
        "<div class=\"total-item\"><span>Subtotal:</span><span>{}</span></div>\n",
        quote.subtotal
    ));
    html.push_str(&format!(
        "<div class=\"total-item\"><span>VAT ({}%):</span><span>{}</span></div>\n",
        format_decimal(VAT_RATE.percentage()),
        quote.vat
    ));
    html.push_str(&format!(
        "<div class=\"total-item total-final\"><span>TOTAL:</span><span>{}</span></div>\n",
        quote.total
    ));
    html.push_str(&format!(
        "<div class=\"total-item\"><span>Approx. USD:</span><span>${}</span></div>\n",
        quote.total_usd
    ));
    html.push_str("</div>\n");
}

fn push_savings(html: &mut String, savings: &SavingsEstimate) {
    let payback = savings
        .payback_years
        .map(|y| format!("{} years", y))
        .unwrap_or_else(|| "n/a".to_string());

    html.push_str("<div class=\"savings-section\">\n<h3>ESTIMATED SAVINGS</h3>\n<div class=\"savings-grid\">\n");
    for (label, value) in [
        ("Monthly savings", savings.monthly_savings.to_string()),
        ("Annual savings", savings.annual_savings.to_string()),
        ("Payback period", payback),
    ] {
        html.push_str(&format!("<div><strong>{}:</strong><br>{}</div>\n", label, value));
    }
    html.push_str("</div>\n</div>\n");
}

fn push_installments(html: &mut String, data: &QuoteResult) {
    html.push_str("<div class=\"installment-section\">\n<h3>INSTALLMENT OPTIONS</h3>\n<div class=\"installment-options\">\n");
    for option in &data.quote.installment_options {
        html.push_str(&format!(
            "<div class=\"installment-option\"><div><strong>{} months</strong></div><div>{}/month</div></div>\n",
            option.months, option.monthly_payment
        ));
    }
    html.push_str("</div>\n</div>\n");
}

fn push_terms(html: &mut String) {
    html.push_str("<div class=\"terms-section\">\n<h3>TERMS AND CONDITIONS</h3>\n<ul class=\"terms-list\">\n");
    for term in TERMS {
        html.push_str(&format!("<li>{}</li>\n", term));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str("<div class=\"signature-section\">\n");
    for party in ["CUSTOMER", "PREPARED BY"] {
        html.push_str(&format!(
            "<div class=\"signature-box\"><strong>{}</strong>\
             <div class=\"signature-line\">(Signature and full name)</div></div>\n",
            party
        ));
    }
    html.push_str("</div>\n");
}

fn push_footer(html: &mut String, company: &CompanyProfile) {
    let parts: Vec<String> = [
        ("Address", &company.address),
        ("Phone", &company.phone),
        ("Email", &company.email),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_blank(value).map(|v| format!("{}: {}", label, escape_html(v))))
    .collect();

    let contact = if parts.is_empty() {
        escape_html(DEFAULT_FOOTER_CONTACT)
    } else {
        parts.join(" | ")
    };

    html.push_str(&format!(
        "<div class=\"footer\">\n<p><strong>{}</strong></p>\n<p>{}</p>\n\
         <p style=\"font-style: italic; margin-top: 10px;\">&quot;{}&quot;</p>\n</div>\n",
        escape_html(company.display_name()),
        contact,
        escape_html(company.display_slogan())
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use solar_catalog::sample_catalog;
    use solar_core::{estimate_savings, CustomerInput, Money, QuoteEngine};

    fn quote_for(name: &str) -> (QuoteResult, SavingsEstimate) {
        let engine = QuoteEngine::new(sample_catalog());
        let result = engine
            .calculate_system(&CustomerInput {
                customer_name: name.into(),
                customer_phone: Some("0901 234 567".into()),
                customer_address: None,
                monthly_bill: Money::from_dong(1_500_000),
                monthly_consumption: None,
                electricity_price: Some(2500.0),
                savings_percent: 70,
                morning_usage: 40,
                evening_usage: 60,
            })
            .unwrap();
        let savings = estimate_savings(
            result.system.power_kw,
            result.customer.electricity_price,
            result.quote.total,
        );
        (result, savings)
    }

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_quote_number_uses_last_six_digits() {
        assert_eq!(quote_number(1_760_000_123_456), "SQ-123456");
        assert_eq!(quote_number(1_000_000_000_042), "SQ-000042");
    }

    #[test]
    fn test_filename_is_sanitised() {
        assert_eq!(
            document_filename("Nguyễn Văn A", 1700),
            "Quote_Nguyễn_Văn_A_1700.html"
        );
        assert_eq!(document_filename("../etc/passwd", 1), "Quote_etcpasswd_1.html");
        assert_eq!(document_filename("  ", 5), "Quote_Customer_5.html");
    }

    #[test]
    fn test_document_contains_lines_and_totals() {
        let (data, savings) = quote_for("Nguyen Van A");
        let doc = render_quote(&data, &savings, &CompanyProfile::default(), issued());

        assert!(doc.html.contains("Date: 16/10/2026"));
        assert!(doc.html.contains("Solar Energy Solutions"));
        for item in &data.quote.items {
            assert!(doc.html.contains(&item.code), "{}", item.code);
        }
        let printed: Money = data.quote.items.iter().map(|i| i.total_price).sum();
        assert_eq!(printed, data.quote.subtotal);
        assert!(doc.html.contains(&format!("<span>TOTAL:</span><span>{}</span>", data.quote.total)));
        assert!(doc.html.contains("36 months"));
        assert!(doc.html.contains(DEFAULT_FOOTER_CONTACT));
        assert!(doc.filename.starts_with("Quote_Nguyen_Van_A_"));
    }

    #[test]
    fn test_company_contact_replaces_default_footer() {
        let (data, savings) = quote_for("Khach");
        let company = CompanyProfile {
            name: Some("Mat Troi Xanh".into()),
            phone: Some("1900 1234".into()),
            ..CompanyProfile::default()
        };
        let doc = render_quote(&data, &savings, &company, issued());

        assert!(doc.html.contains("<h1>Mat Troi Xanh</h1>"));
        assert!(doc.html.contains("Hotline: 1900 1234"));
        assert!(doc.html.contains("<p>Phone: 1900 1234</p>"));
        assert!(!doc.html.contains(DEFAULT_FOOTER_CONTACT));
    }

    #[test]
    fn test_user_text_is_escaped_and_logo_restricted() {
        let (data, savings) = quote_for("<script>alert(1)</script>");
        let company = CompanyProfile {
            logo_data_url: Some("javascript:alert(1)".into()),
            ..CompanyProfile::default()
        };
        let doc = render_quote(&data, &savings, &company, issued());

        assert!(!doc.html.contains("<script>"));
        assert!(doc.html.contains("&lt;script&gt;"));
        assert!(!doc.html.contains("javascript:"));

        let company = CompanyProfile {
            logo_data_url: Some("data:image/png;base64,AAAA".into()),
            ..CompanyProfile::default()
        };
        let doc = render_quote(&data, &savings, &company, issued());
        assert!(doc.html.contains("<img src=\"data:image/png;base64,AAAA\""));
    }
}
