/// Early-bird unit price in minor units: `base * (1 - percent/100)`,
/// rounded half-up to the minor unit so stored amounts never drift from
/// recomputed ones.
pub fn early_bird_price_minor(base_minor: i64, discount_percent: i32) -> i64 {
    let pct = discount_percent.clamp(0, 100) as i64;
    (base_minor * (100 - pct) + 50) / 100
}

/// The amount invariant, enforced at write time:
/// `amount = price_per_ticket * quantity - discount`.
pub fn compute_amount_minor(price_per_ticket_minor: i64, quantity: i32, discount_minor: i64) -> i64 {
    price_per_ticket_minor * quantity as i64 - discount_minor
}
