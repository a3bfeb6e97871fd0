use transport::FormPart;

use super::{ImageChange, ValidationContext, ValidationErrors, Validate, check_min_len};
use crate::model::Category;
use crate::slug::{is_valid_slug, slugify};

/// Category create/edit form. The slug has no setter of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    name: String,
    slug: String,
    pub description: String,
    pub is_active: bool,
    pub image: ImageChange,
    current_image_url: Option<String>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            is_active: true,
            image: ImageChange::Unchanged,
            current_image_url: None,
        }
    }
}

impl CategoryForm {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: slugify(&category.name),
            description: category.description.clone(),
            is_active: category.is_active,
            image: ImageChange::Unchanged,
            current_image_url: category.image_url.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.slug = slugify(&self.name);
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Image the view should preview: the pending replacement wins, then the
    /// stored one unless it is being removed.
    pub fn preview(&self) -> Option<&str> {
        match &self.image {
            ImageChange::Replace(image) => Some(image.file_name.as_str()),
            ImageChange::Remove => None,
            ImageChange::Unchanged => self.current_image_url.as_deref(),
        }
    }

    pub fn apply_to(&self, category: &mut Category) {
        category.name = self.name.trim().to_string();
        category.slug = self.slug.clone();
        category.description = self.description.clone();
        category.is_active = self.is_active;
        if self.image.is_removal() {
            category.image_url = None;
        }
    }

    pub fn to_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("name", self.name.trim()),
            FormPart::text("slug", &self.slug),
            FormPart::text("description", &self.description),
            FormPart::text("isActive", self.is_active.to_string()),
        ];
        match &self.image {
            ImageChange::Replace(image) => parts.push(image.to_part("image")),
            ImageChange::Remove => parts.push(FormPart::text("isImageDeleted", "true")),
            ImageChange::Unchanged => {}
        }
        parts
    }
}

impl Validate for CategoryForm {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "name", &self.name, 2);
        if !is_valid_slug(&self.slug) {
            errors.add("slug", "Name must contain letters or numbers");
        }
        errors.into_result()
    }
}
