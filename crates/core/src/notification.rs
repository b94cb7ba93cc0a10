//! Notification message templates.
//!
//! Email bodies carry `{{ name }}` / `{{ entry }}` placeholders that are
//! filled per recipient at send time; in-app messages are rendered eagerly.

use std::collections::BTreeMap;

/// Template variable holding the recipient's display name.
pub const VAR_NAME: &str = "name";

/// Template variable holding the entry title.
pub const VAR_ENTRY: &str = "entry";

/// What happened to trigger the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A version of the recipient's entry was created or updated.
    EntryModified,
    /// A version the recipient authored was deleted.
    VersionDeleted,
}

/// Subject plus plain-text and HTML bodies, still containing placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub subject: &'static str,
    pub text: &'static str,
    pub html: &'static str,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntryModified => "entry_modified",
            Self::VersionDeleted => "version_deleted",
        }
    }

    pub fn email_template(&self) -> MessageTemplate {
        match self {
            Self::EntryModified => MessageTemplate {
                subject: "Your entry has been modified",
                text: "Hello {{ name }},\nYour entry \"{{ entry }}\" has been modified.",
                html: "<p>Hello {{ name }},</p><p>Your entry \"{{ entry }}\" has been modified.</p>",
            },
            Self::VersionDeleted => MessageTemplate {
                subject: "Your edit has been deleted",
                text: "Hello {{ name }},\nYour version of the entry \"{{ entry }}\" has been deleted.",
                html: "<p>Hello {{ name }},</p><p>Your version of the entry \"{{ entry }}\" has been deleted.</p>",
            },
        }
    }

    /// Short message for the in-app notification channel.
    pub fn in_app_message(&self, entry_title: &str) -> String {
        match self {
            Self::EntryModified => format!("Your entry {entry_title} has been modified"),
            Self::VersionDeleted => {
                format!("Your version of the entry {entry_title} has been deleted")
            }
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the per-recipient variable set.
pub fn template_vars(recipient_name: &str, entry_title: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (VAR_NAME.to_string(), recipient_name.to_string()),
        (VAR_ENTRY.to_string(), entry_title.to_string()),
    ])
}

/// Replace `{{ key }}` (whitespace inside the braces optional) with the
/// matching variable. Unknown placeholders are left as-is.
pub fn render(template: &str, vars: &BTreeMap<String, String>) -> String {
    substitute(template, vars, |out, value| out.push_str(value))
}

/// Like [`render`], but variable values are HTML-escaped. The template
/// itself is trusted markup and passes through unchanged.
pub fn render_html(template: &str, vars: &BTreeMap<String, String>) -> String {
    substitute(template, vars, push_escaped_html)
}

fn push_escaped_html(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

fn substitute(
    template: &str,
    vars: &BTreeMap<String, String>,
    push_value: impl Fn(&mut String, &str),
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => push_value(&mut out, value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
