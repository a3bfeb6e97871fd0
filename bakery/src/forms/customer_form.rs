use serde::Serialize;
use transport::FormPart;

use super::{
    ImageChange, ValidationContext, ValidationErrors, Validate, check_email, check_min_len,
    check_phone, optional_text,
};
use crate::model::Customer;

/// JSON body used when no file is attached.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub remove_image: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub occupation: String,
    pub image: ImageChange,
}

impl CustomerForm {
    pub fn from_customer(customer: &Customer) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: text(&customer.phone),
            address: text(&customer.address),
            city: text(&customer.city),
            state: text(&customer.state),
            postal_code: text(&customer.postal_code),
            country: text(&customer.country),
            occupation: text(&customer.occupation),
            image: ImageChange::Unchanged,
        }
    }

    /// Whether the request has to go out as multipart.
    pub fn has_upload(&self) -> bool {
        self.image.replacement().is_some()
    }

    pub fn to_payload(&self) -> CustomerPayload {
        CustomerPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: optional_text(&self.phone),
            address: optional_text(&self.address),
            city: optional_text(&self.city),
            state: optional_text(&self.state),
            postal_code: optional_text(&self.postal_code),
            country: optional_text(&self.country),
            occupation: optional_text(&self.occupation),
            remove_image: self.image.is_removal(),
        }
    }

    /// Writes the form onto a local copy, for optimistic list patches.
    pub fn apply_to(&self, customer: &mut Customer) {
        let payload = self.to_payload();
        customer.name = payload.name;
        customer.email = payload.email;
        customer.phone = payload.phone;
        customer.address = payload.address;
        customer.city = payload.city;
        customer.state = payload.state;
        customer.postal_code = payload.postal_code;
        customer.country = payload.country;
        customer.occupation = payload.occupation;
        if payload.remove_image {
            customer.image_url = None;
        }
    }

    /// Multipart body; optional text fields are left out when blank.
    pub fn to_parts(&self) -> Vec<FormPart> {
        let mut parts = vec![
            FormPart::text("name", self.name.trim()),
            FormPart::text("email", self.email.trim()),
        ];
        let optional = [
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
            ("occupation", &self.occupation),
        ];
        for (field, value) in optional {
            if let Some(value) = optional_text(value) {
                parts.push(FormPart::text(field, value));
            }
        }
        match &self.image {
            ImageChange::Replace(image) => parts.push(image.to_part("image")),
            ImageChange::Remove => parts.push(FormPart::text("remove_image", "true")),
            ImageChange::Unchanged => {}
        }
        parts
    }
}

impl Validate for CustomerForm {
    fn validate(&self, _ctx: &ValidationContext) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_min_len(&mut errors, "name", &self.name, 2);
        check_email(&mut errors, "email", &self.email);
        if !self.phone.trim().is_empty() {
            check_phone(&mut errors, "phone", &self.phone);
        }
        errors.into_result()
    }
}
