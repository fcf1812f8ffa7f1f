use event_engine::domain::participant::{
    format_registration_number, format_ticket_number, generate_attendance_token,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn registration_number_is_event_scoped_and_padded() {
    assert_eq!(format_registration_number(7, 1), "EVT70001");
    assert_eq!(format_registration_number(7, 12), "EVT70012");
    assert_eq!(format_registration_number(42, 999), "EVT420999");
}

#[test]
fn ticket_number_carries_event_code_and_six_digit_suffix() {
    let n = format_ticket_number(7, 123);
    assert_eq!(n, "TKT7000123");

    let wrapped = format_ticket_number(7, 1_234_567);
    assert_eq!(wrapped, "TKT7234567");
}

#[test]
fn sequential_registration_numbers_never_collide() {
    // Sequence values come from an atomic per-event counter, so distinct draws
    // must always format to distinct numbers.
    let numbers: std::collections::HashSet<String> =
        (1..=50).map(|seq| format_registration_number(7, seq)).collect();
    assert_eq!(numbers.len(), 50);
}

#[test]
fn attendance_token_is_ten_digits() {
    let mut rng = StdRng::seed_from_u64(42);
    let token = generate_attendance_token(&mut rng);
    assert_eq!(token.len(), 10);
    assert!(token.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn tokens_from_different_rng_states_differ() {
    let a = generate_attendance_token(&mut StdRng::seed_from_u64(1));
    let b = generate_attendance_token(&mut StdRng::seed_from_u64(2));
    assert_ne!(a, b);
}
