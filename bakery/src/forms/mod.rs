//! Form state, validation and the submit flow shared by every admin form.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::path::Path;

use transport::FormPart;

use crate::errors::{Error, Result};

pub mod category_form;
pub mod customer_form;
pub mod offer_form;
pub mod order_form;
pub mod product_form;

pub use category_form::CategoryForm;
pub use customer_form::{CustomerForm, CustomerPayload};
pub use offer_form::OfferForm;
pub use order_form::{NewOrder, NewOrderItem, OrderForm, OrderItemDraft, OrderUpdate};
pub use product_form::ProductForm;

/// Field-scoped messages, rendered inline under each input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// What a schema may look at besides the form itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext {
    pub mode: FormMode,
    pub now: DateTime<Utc>,
}

impl ValidationContext {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            now: Utc::now(),
        }
    }

    pub fn edit() -> Self {
        Self {
            mode: FormMode::Edit,
            now: Utc::now(),
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

pub trait Validate {
    fn validate(&self, ctx: &ValidationContext) -> std::result::Result<(), ValidationErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    CreateAnother,
}

/// What the containing dialog should do after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Close,
    Reset,
}

/// A form being filled in: current values, inline errors and the in-flight
/// flag a view disables its buttons on.
#[derive(Debug, Clone)]
pub struct FormSession<F> {
    pub form: F,
    pub mode: FormMode,
    errors: ValidationErrors,
    submitting: bool,
}

impl<F: Validate + Default + Clone> FormSession<F> {
    pub fn create() -> Self {
        Self {
            form: F::default(),
            mode: FormMode::Create,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    pub fn edit(form: F) -> Self {
        Self {
            form,
            mode: FormMode::Edit,
            errors: ValidationErrors::new(),
            submitting: false,
        }
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn context(&self, now: DateTime<Utc>) -> ValidationContext {
        ValidationContext {
            mode: self.mode,
            now,
        }
    }

    /// Validates, then hands a copy of the form to `action`. Validation
    /// failures never reach `action`. After success a `CreateAnother` submit
    /// in create mode resets the form to its defaults.
    pub async fn submit<T, Fut>(
        &mut self,
        submit_mode: SubmitMode,
        now: DateTime<Utc>,
        action: impl FnOnce(F) -> Fut,
    ) -> Result<(FormOutcome, T)>
    where
        Fut: Future<Output = Result<T>>,
    {
        if let Err(errors) = self.form.validate(&self.context(now)) {
            tracing::debug!(errors = %errors, "Form validation failed");
            self.errors = errors.clone();
            return Err(Error::Validation(errors));
        }
        self.errors = ValidationErrors::new();

        self.submitting = true;
        let result = action(self.form.clone()).await;
        self.submitting = false;

        let value = result?;
        let outcome = match (submit_mode, self.mode) {
            (SubmitMode::CreateAnother, FormMode::Create) => {
                self.form = F::default();
                FormOutcome::Reset
            }
            _ => FormOutcome::Close,
        };
        Ok((outcome, value))
    }
}

/// A file picked from local disk for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    pub fn new(file_name: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type_for(file_name).to_string(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(&file_name, bytes))
    }

    pub fn to_part(&self, field: &str) -> FormPart {
        FormPart::file(field, &self.file_name, &self.content_type, self.bytes.clone())
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Image field of an edit form. `Remove` is sent as an explicit deletion flag
/// so the server can tell it apart from `Unchanged`, which sends nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImageChange {
    #[default]
    Unchanged,
    Replace(LocalImage),
    Remove,
}

impl ImageChange {
    pub fn is_removal(&self) -> bool {
        matches!(self, ImageChange::Remove)
    }

    pub fn replacement(&self) -> Option<&LocalImage> {
        match self {
            ImageChange::Replace(image) => Some(image),
            _ => None,
        }
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9 ()\-]{7,20}$").unwrap_or_else(|e| panic!("invalid phone regex: {e}"))
});

pub(crate) fn check_min_len(errors: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    if value.trim().chars().count() < min {
        errors.add(field, format!("Must be at least {min} characters"));
    }
}

pub(crate) fn check_email(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !EMAIL.is_match(value.trim()) {
        errors.add(field, "Invalid email address");
    }
}

pub(crate) fn check_phone(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !PHONE.is_match(value.trim()) {
        errors.add(field, "Invalid phone number");
    }
}

pub(crate) fn check_non_negative(errors: &mut ValidationErrors, field: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.add(field, "Must be zero or greater");
    }
}

/// True when `value` has at most two digits after the decimal point.
pub(crate) fn has_at_most_two_decimals(value: f64) -> bool {
    let cents = value * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
