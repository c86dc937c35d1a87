//! Email signature rendering as an HTML fragment or plain text.

use serde::{Deserialize, Serialize};

use crate::utils::{GenError, Result, require_non_empty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureStyle {
    Minimal,
    #[default]
    Professional,
    Modern,
}

/// The fields a signature can show. Empty optional fields are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureDetails {
    pub full_name: String,
    pub job_title: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    /// CSS hex colour for the name and rule, e.g. `#2563eb`
    pub accent_color: String,
}

impl Default for SignatureDetails {
    fn default() -> Self {
        SignatureDetails {
            full_name: String::new(),
            job_title: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            accent_color: "#2563eb".to_string(),
        }
    }
}

impl SignatureDetails {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("full name", &self.full_name)?;
        require_non_empty("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(GenError::Validation(format!("'{}' is not an email address", self.email)));
        }
        if !is_hex_color(&self.accent_color) {
            return Err(GenError::Validation(format!(
                "'{}' is not a hex colour",
                self.accent_color
            )));
        }
        Ok(())
    }

    /// "Title, Company", "Title", "Company" or nothing
    fn role_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.job_title.trim(), self.company.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn website_href(website: &str) -> String {
    if website.starts_with("http://") || website.starts_with("https://") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

/// Render the signature as an inline-styled HTML fragment
pub fn render_html(details: &SignatureDetails, style: SignatureStyle) -> Result<String> {
    details.validate()?;
    let accent = &details.accent_color;
    let name = escape_html(details.full_name.trim());
    let email = escape_html(details.email.trim());

    let mut contact = vec![format!(
        "<a href=\"mailto:{email}\" style=\"color:{accent};text-decoration:none;\">{email}</a>"
    )];
    if !details.phone.trim().is_empty() {
        contact.push(escape_html(details.phone.trim()));
    }
    if !details.website.trim().is_empty() {
        let site = details.website.trim();
        contact.push(format!(
            "<a href=\"{}\" style=\"color:{accent};text-decoration:none;\">{}</a>",
            escape_html(&website_href(site)),
            escape_html(site)
        ));
    }
    let role = details.role_line().map(|r| escape_html(&r));

    let html = match style {
        SignatureStyle::Minimal => {
            let mut lines = vec![format!("<strong>{name}</strong>")];
            lines.extend(role);
            lines.push(contact.join(" | "));
            format!(
                "<div style=\"font-family:Arial,sans-serif;font-size:13px;color:#333;\">{}</div>",
                lines.join("<br>")
            )
        }
        SignatureStyle::Professional => {
            let role = role
                .map(|r| format!("<div style=\"color:#555;\">{r}</div>"))
                .unwrap_or_default();
            format!(
                "<table cellpadding=\"0\" cellspacing=\"0\" style=\"font-family:Arial,sans-serif;font-size:13px;color:#333;\">\
                 <tr><td style=\"border-left:3px solid {accent};padding-left:10px;\">\
                 <div style=\"font-size:15px;font-weight:bold;color:{accent};\">{name}</div>\
                 {role}<div style=\"margin-top:4px;\">{}</div></td></tr></table>",
                contact.join(" &middot; ")
            )
        }
        SignatureStyle::Modern => {
            let role = role
                .map(|r| format!("<div style=\"text-transform:uppercase;letter-spacing:1px;font-size:11px;color:#777;\">{r}</div>"))
                .unwrap_or_default();
            format!(
                "<div style=\"font-family:Helvetica,Arial,sans-serif;font-size:13px;color:#222;\">\
                 <div style=\"font-size:18px;font-weight:600;\">{name}</div>{role}\
                 <hr style=\"border:none;border-top:2px solid {accent};width:40px;margin:8px 0;\">\
                 <div>{}</div></div>",
                contact.join("<br>")
            )
        }
    };
    Ok(html)
}

/// Render the signature as plain text
pub fn render_text(details: &SignatureDetails) -> Result<String> {
    details.validate()?;
    let mut lines = vec!["--".to_string(), details.full_name.trim().to_string()];
    lines.extend(details.role_line());
    lines.push(details.email.trim().to_string());
    for extra in [&details.phone, &details.website] {
        if !extra.trim().is_empty() {
            lines.push(extra.trim().to_string());
        }
    }
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn details() -> SignatureDetails {
        SignatureDetails {
            full_name: "Ada Lovelace".to_string(),
            job_title: "Head of Growth".to_string(),
            company: "Analytical & Co".to_string(),
            email: "ada@example.com".to_string(),
            website: "example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_html_escapes_values() {
        let html = render_html(&details(), SignatureStyle::Professional).unwrap();
        assert!(html.contains("Head of Growth, Analytical &amp; Co"));
        assert!(html.contains("href=\"mailto:ada@example.com\""));
        assert!(html.contains("href=\"https://example.com\""));
        assert!(html.contains("border-left:3px solid #2563eb"));
        assert!(!html.contains("Analytical & Co"));
    }

    #[test]
    fn test_every_style_renders() {
        for style in [SignatureStyle::Minimal, SignatureStyle::Professional, SignatureStyle::Modern] {
            let html = render_html(&details(), style).unwrap();
            assert!(html.contains("Ada Lovelace"));
        }
    }

    #[test]
    fn test_render_text() {
        let mut d = details();
        d.company.clear();
        assert_eq!(
            render_text(&d).unwrap(),
            "--\nAda Lovelace\nHead of Growth\nada@example.com\nexample.com"
        );
    }

    #[test]
    fn test_validation() {
        let mut d = details();
        d.email = "not-an-email".to_string();
        assert!(render_text(&d).is_err());

        let mut d = details();
        d.accent_color = "blue".to_string();
        assert!(render_html(&d, SignatureStyle::Minimal).is_err());

        let d = SignatureDetails::default();
        assert!(render_text(&d).is_err());
    }
}
