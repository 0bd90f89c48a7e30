//! Formats the notification sent to the site operators.

use crate::config::MailConfig;
use crate::mail::OutboundEmail;

use super::model::ContactSubmission;

/// Build the outbound notification for a valid submission.
///
/// Replies go straight to the submitter; the no-reply sender is never the
/// reply target.
pub fn compose(submission: &ContactSubmission, config: &MailConfig) -> OutboundEmail {
    OutboundEmail {
        to: config.to_address.clone(),
        from: config.from_address.clone(),
        reply_to: submission.email.clone(),
        subject: format!("New Contact Form Submission from {}", submission.name),
        text: render_text(submission),
        html: render_html(submission),
    }
}

pub fn render_text(submission: &ContactSubmission) -> String {
    let mut text = format!("Name: {}\nEmail: {}\n", submission.name, submission.email);
    if let Some(company) = submission.company() {
        text.push_str(&format!("Company: {company}\n"));
    }
    text.push_str(&format!("\nMessage:\n{}\n", submission.message));
    text
}

pub fn render_html(submission: &ContactSubmission) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(&submission.email);
    let message = escape_html(&submission.message);

    let company = submission
        .company()
        .map(|company| {
            format!(
                r##"
            <p style="margin: 10px 0;">
              <strong style="color: #374151;">Company:</strong><br/>
              <span style="color: #6b7280;">{}</span>
            </p>"##,
                escape_html(company)
            )
        })
        .unwrap_or_default();

    format!(
        r##"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <div style="background: linear-gradient(135deg, #DC2626 0%, #F97316 100%); padding: 30px; text-align: center;">
    <h1 style="color: white; margin: 0;">New Contact Form Submission</h1>
  </div>
  <div style="padding: 30px; background: #f9fafb;">
    <div style="background: white; padding: 30px; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.1);">
            <h2 style="color: #111827; margin-top: 0;">Contact Details</h2>
            <p style="margin: 10px 0;">
              <strong style="color: #374151;">Name:</strong><br/>
              <span style="color: #6b7280;">{name}</span>
            </p>
            <p style="margin: 10px 0;">
              <strong style="color: #374151;">Email:</strong><br/>
              <a href="mailto:{email}" style="color: #DC2626;">{email}</a>
            </p>{company}
            <p style="margin: 20px 0 10px 0;">
              <strong style="color: #374151;">Message:</strong>
            </p>
            <div style="background: #f9fafb; padding: 15px; border-radius: 6px; border-left: 4px solid #DC2626;">
              <p style="color: #374151; margin: 0; white-space: pre-wrap;">{message}</p>
            </div>
    </div>
  </div>
  <div style="padding: 20px; text-align: center; color: #6b7280; font-size: 12px;">
    <p>This email was sent from the HOTFIX contact form</p>
  </div>
</div>"##
    )
}

/// Escape the characters that matter inside HTML text and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
