/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an order id for a submitted order.
///
/// Time-based, "MP" prefix, unique per submission at human ordering
/// pace. Used as the receipt and tracking key.
pub fn order_id() -> String {
    format!("MP{}", now_millis())
}

/// Random queue position shown on the tracking screen when the
/// submitted order did not carry one.
pub fn queue_number() -> u32 {
    use rand::Rng;
    rand::thread_rng().gen_range(1..=5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_has_prefix_and_timestamp() {
        let id = order_id();
        assert!(id.starts_with("MP"));
        let millis: i64 = id[2..].parse().expect("numeric suffix");
        assert!(millis > 0);
    }

    #[test]
    fn queue_number_in_display_range() {
        for _ in 0..50 {
            let n = queue_number();
            assert!((1..=5).contains(&n));
        }
    }
}
