//! Page rendering and output for salonsite.
//!
//! - [`Renderer`] wraps a Tera instance holding the page templates, either the
//!   built-in set compiled into the binary or a directory override.
//! - [`writer::write_page`] writes a rendered page (optionally minified).

pub mod minify;
pub mod writer;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera, Value};
use tracing::{debug, instrument};

use salonsite_shared::{Result, SalonSiteError};

pub use minify::minify_html;
pub use writer::{WrittenFile, write_page};

/// Templates every page set must provide.
pub const PAGE_TEMPLATES: &[&str] = &[
    "index.html",
    "services.html",
    "store.html",
    "contact.html",
    "offers.html",
    "cancellation-policy.html",
    "booking-policy.html",
];

/// Built-in templates, compiled into the binary.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("services.html", include_str!("../templates/services.html")),
    ("store.html", include_str!("../templates/store.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("offers.html", include_str!("../templates/offers.html")),
    (
        "cancellation-policy.html",
        include_str!("../templates/cancellation-policy.html"),
    ),
    (
        "booking-policy.html",
        include_str!("../templates/booking-policy.html"),
    ),
];

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders page view models through Tera templates.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Renderer using the built-in template set.
    pub fn builtin() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN_TEMPLATES.to_vec())
            .map_err(|e| SalonSiteError::Template(describe(&e)))?;
        Self::finish(tera)
    }

    /// Renderer loading every `*.html` under `dir` (recursively).
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let pattern = format!("{}/**/*.html", dir.display());
        let tera = Tera::new(&pattern).map_err(|e| {
            SalonSiteError::Template(format!("loading {}: {}", dir.display(), describe(&e)))
        })?;
        Self::finish(tera)
    }

    fn finish(mut tera: Tera) -> Result<Self> {
        if let Some(missing) = PAGE_TEMPLATES
            .iter()
            .find(|t| !tera.get_template_names().any(|n| n == **t))
        {
            return Err(SalonSiteError::Template(format!(
                "template set is missing {missing}"
            )));
        }

        // No HTML escaping: URLs and sheet text render verbatim.
        tera.autoescape_on(vec![]);
        tera.register_filter("inr", inr_filter);
        debug!(templates = tera.get_template_names().count(), "templates loaded");
        Ok(Self { tera })
    }

    /// Render `template` with a serializable view model as its context.
    #[instrument(skip(self, context))]
    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        let context = Context::from_serialize(context).map_err(|e| {
            SalonSiteError::Template(format!("{template}: invalid context: {}", describe(&e)))
        })?;

        self.tera
            .render(template, &context)
            .map_err(|e| SalonSiteError::Template(format!("{template}: {}", describe(&e))))
    }
}

/// Flatten a Tera error and its sources into one line.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// `{{ price | inr }}` → `₹1,200`. Non-numbers render as empty.
fn inr_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(value.as_f64().map(format_inr).unwrap_or_default()))
}

/// Format an amount in rupees with Indian digit grouping (`₹1,25,000`).
/// Whole amounts drop the decimals; others keep two places.
pub fn format_inr(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let whole = rounded.trunc() as u64;
    let paise = ((rounded - rounded.trunc()) * 100.0).round() as u64;

    let digits = whole.to_string();
    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut end = head.len();
        while end > 2 {
            groups.push(&head[end - 2..end]);
            end -= 2;
        }
        groups.push(&head[..end]);
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    if paise == 0 {
        format!("₹{grouped}")
    } else {
        format!("₹{grouped}.{paise:02}")
    }
}
