use chrono::{Local, NaiveDate};
use rand::Rng;

/// `ORD-YYMMDD-XXXX` for today with a random four digit suffix.
pub fn generate_order_number() -> String {
    order_number_for(Local::now().date_naive(), &mut rand::rng())
}

pub fn order_number_for<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> String {
    let suffix: u16 = rng.random_range(1000..=9999);
    format!("ORD-{}-{suffix}", date.format("%y%m%d"))
}
