//! Contact list exports: CSV and vCard.
//!
//! Both are plain string renditions of the full contact list; writing
//! them anywhere is the caller's business.

use crate::types::Contact;
use crate::util::format_long_date;

const CSV_HEADER: &str = "Name,Event,Industry,Email,Phone,Company,Interests,Notes,Tagged Date";

/// Render the contact list as CSV, one row per contact. Every field is
/// quoted; embedded quotes are doubled.
pub fn contacts_to_csv(contacts: &[Contact]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for contact in contacts {
        let fields = [
            contact.contact_name.as_str(),
            contact.event.as_str(),
            contact.industry.as_str(),
            contact.email.as_deref().unwrap_or(""),
            contact.phone.as_deref().unwrap_or(""),
            contact.company.as_deref().unwrap_or(""),
            &contact.interests.join(", "),
            contact.notes.as_deref().unwrap_or(""),
            &format_long_date(&contact.tagged_at),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_quote(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render the contact list as a vCard 3.0 stream, one record per
/// contact. Event and notes fold into the NOTE field; industry goes to
/// CATEGORIES.
pub fn contacts_to_vcard(contacts: &[Contact]) -> String {
    let mut out = String::new();
    for contact in contacts {
        out.push_str("BEGIN:VCARD\r\n");
        out.push_str("VERSION:3.0\r\n");
        push_property(&mut out, "FN", &contact.contact_name);
        push_property(&mut out, "N", &format!("{};;;;", vcard_escape(&contact.contact_name)));
        if let Some(email) = contact.email.as_deref().filter(|s| !s.is_empty()) {
            push_property(&mut out, "EMAIL", email);
        }
        if let Some(phone) = contact.phone.as_deref().filter(|s| !s.is_empty()) {
            push_property(&mut out, "TEL", phone);
        }
        if let Some(company) = contact.company.as_deref().filter(|s| !s.is_empty()) {
            push_property(&mut out, "ORG", company);
        }
        if !contact.industry.is_empty() {
            push_property(&mut out, "CATEGORIES", &contact.industry);
        }
        let note = vcard_note(contact);
        if !note.is_empty() {
            push_property(&mut out, "NOTE", &note);
        }
        out.push_str("END:VCARD\r\n");
    }
    out
}

fn vcard_note(contact: &Contact) -> String {
    let mut parts = Vec::new();
    if !contact.event.trim().is_empty() {
        parts.push(format!("Met at {}", contact.event));
    }
    if let Some(notes) = contact.notes.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(notes.to_string());
    }
    parts.join(". ")
}

/// FN is written raw per common practice; structured fields escape
/// backslash, comma, semicolon, and newline.
fn push_property(out: &mut String, name: &str, value: &str) {
    let value = if name == "N" {
        value.to_string()
    } else {
        vcard_escape(value)
    };
    out.push_str(name);
    out.push(':');
    out.push_str(&value);
    out.push_str("\r\n");
}

fn vcard_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FollowUpStatus;

    fn contact(name: &str) -> Contact {
        Contact {
            id: "c1".to_string(),
            contact_name: name.to_string(),
            event: "RustConf".to_string(),
            industry: "Tech".to_string(),
            interests: vec!["rust".to_string(), "wasm".to_string()],
            tagged_at: "2026-03-05T09:30:00Z".to_string(),
            follow_up_status: FollowUpStatus::None,
            follow_up_due_date: None,
            follow_up_date: None,
            snoozed_until: None,
            is_quick_tag: false,
            email: Some("ada@example.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            company: Some("Analytical Engines, Ltd".to_string()),
            title: None,
            notes: Some("Ask about the difference engine".to_string()),
        }
    }

    #[test]
    fn csv_has_header_and_one_row_per_contact() {
        let csv = contacts_to_csv(&[contact("Ada"), contact("Grace")]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert!(lines[1].starts_with("\"Ada\",\"RustConf\",\"Tech\""));
    }

    #[test]
    fn csv_joins_interests_and_formats_date() {
        let csv = contacts_to_csv(&[contact("Ada")]);
        assert!(csv.contains("\"rust, wasm\""));
        assert!(csv.contains("\"March 5, 2026\""));
    }

    #[test]
    fn csv_doubles_embedded_quotes() {
        let mut c = contact("Ada");
        c.notes = Some("said \"hello\"".to_string());
        let csv = contacts_to_csv(&[c]);
        assert!(csv.contains("\"said \"\"hello\"\"\""));
    }

    #[test]
    fn csv_empty_list_is_header_only() {
        let csv = contacts_to_csv(&[]);
        assert_eq!(csv, format!("{}\n", CSV_HEADER));
    }

    #[test]
    fn vcard_frames_each_contact() {
        let vcf = contacts_to_vcard(&[contact("Ada"), contact("Grace")]);
        assert_eq!(vcf.matches("BEGIN:VCARD").count(), 2);
        assert_eq!(vcf.matches("END:VCARD").count(), 2);
        assert!(vcf.contains("VERSION:3.0"));
        assert!(vcf.contains("FN:Ada"));
        assert!(vcf.contains("EMAIL:ada@example.com"));
    }

    #[test]
    fn vcard_folds_event_and_notes_into_note() {
        let vcf = contacts_to_vcard(&[contact("Ada")]);
        assert!(vcf.contains("NOTE:Met at RustConf. Ask about the difference engine"));
    }

    #[test]
    fn vcard_escapes_structured_characters() {
        let vcf = contacts_to_vcard(&[contact("Ada")]);
        assert!(vcf.contains("ORG:Analytical Engines\\, Ltd"));
    }

    #[test]
    fn vcard_skips_empty_fields() {
        let mut c = contact("Ada");
        c.email = None;
        c.phone = Some(String::new());
        c.event = String::new();
        c.notes = None;
        let vcf = contacts_to_vcard(&[c]);
        assert!(!vcf.contains("EMAIL:"));
        assert!(!vcf.contains("TEL:"));
        assert!(!vcf.contains("NOTE:"));
    }
}
