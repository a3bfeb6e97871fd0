use crate::model::{Category, Customer, Offer, Order, Product};

/// A record that can be written as one CSV line.
pub trait CsvRow {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn line(fields: impl IntoIterator<Item = String>) -> String {
    fields
        .into_iter()
        .map(|f| escape(&f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header line followed by one line per row.
pub fn to_csv<T: CsvRow>(rows: &[T]) -> String {
    let mut out = line(T::headers().iter().map(|h| h.to_string()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.row()));
        out.push('\n');
    }
    out
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl CsvRow for Customer {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "email", "phone", "city", "country", "created_at"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.email.clone(),
            opt(&self.phone),
            opt(&self.city),
            opt(&self.country),
            self.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    }
}

impl CsvRow for Product {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "slug", "price", "compare_at_price", "quantity", "active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.slug.clone(),
            format!("{:.2}", self.price),
            self.compare_at_price
                .map(|p| format!("{p:.2}"))
                .unwrap_or_default(),
            self.quantity.to_string(),
            self.is_active.to_string(),
        ]
    }
}

impl CsvRow for Category {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "slug", "active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.slug.clone(),
            self.is_active.to_string(),
        ]
    }
}

impl CsvRow for Order {
    fn headers() -> &'static [&'static str] {
        &["id", "order_number", "customer_id", "status", "currency", "items", "total", "created_at"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.order_number.clone(),
            self.customer_id.to_string(),
            self.status.to_string(),
            self.currency.clone(),
            self.items.len().to_string(),
            format!("{:.2}", self.grand_total()),
            self.created_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        ]
    }
}

impl CsvRow for Offer {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "product_id", "discount_type", "discount_value", "start_time", "end_time", "active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.product_id.to_string(),
            self.discount_type.to_string(),
            self.discount_value.to_string(),
            self.start_time.to_rfc3339(),
            self.end_time.to_rfc3339(),
            self.is_active.to_string(),
        ]
    }
}
