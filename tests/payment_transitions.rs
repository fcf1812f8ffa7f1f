use chrono::{Duration, TimeZone, Utc};
use event_engine::domain::payment::{Payment, PaymentMethod, PaymentStatus, TicketSelection};
use event_engine::service::payment_service::replay_matches;
use event_engine::statemachine::transitions::{plan_transition, TransitionPlan};
use event_engine::windows::pricing::{compute_amount_minor, early_bird_price_minor};
use uuid::Uuid;

#[test]
fn pending_moves_to_each_terminal_state() {
    use PaymentStatus::*;
    for terminal in [Paid, Failed, Expired] {
        assert_eq!(plan_transition(Pending, terminal), TransitionPlan::Apply(terminal));
    }
}

#[test]
fn replayed_terminal_status_is_a_duplicate() {
    use PaymentStatus::*;
    assert_eq!(plan_transition(Paid, Paid), TransitionPlan::Duplicate);
    assert_eq!(plan_transition(Failed, Failed), TransitionPlan::Duplicate);
    assert_eq!(plan_transition(Expired, Expired), TransitionPlan::Duplicate);
}

#[test]
fn terminal_states_have_no_exit() {
    use PaymentStatus::*;
    assert_eq!(plan_transition(Paid, Failed), TransitionPlan::Rejected);
    assert_eq!(plan_transition(Paid, Expired), TransitionPlan::Rejected);
    assert_eq!(plan_transition(Failed, Paid), TransitionPlan::Rejected);
    assert_eq!(plan_transition(Expired, Paid), TransitionPlan::Rejected);
}

#[test]
fn nothing_moves_back_to_pending() {
    use PaymentStatus::*;
    for current in [Paid, Failed, Expired] {
        assert_eq!(plan_transition(current, Pending), TransitionPlan::Rejected);
    }
    assert_eq!(plan_transition(Pending, Pending), TransitionPlan::Duplicate);
}

#[test]
fn early_bird_discounts_twenty_percent() {
    assert_eq!(early_bird_price_minor(100_000, 20), 80_000);
}

#[test]
fn early_bird_rounds_half_up_to_minor_unit() {
    // 150 * 0.67 = 100.5 -> 101
    assert_eq!(early_bird_price_minor(150, 33), 101);
    assert_eq!(early_bird_price_minor(100_000, 0), 100_000);
    assert_eq!(early_bird_price_minor(100_000, 100), 0);
}

#[test]
fn amount_invariant_holds() {
    assert_eq!(compute_amount_minor(50_000, 2, 10_000), 90_000);
    assert_eq!(compute_amount_minor(50_000, 1, 0), 50_000);
}

#[test]
fn gateway_status_vocabulary_is_normalized() {
    assert_eq!(PaymentStatus::parse("PAID"), Some(PaymentStatus::Paid));
    assert_eq!(PaymentStatus::parse("settled"), Some(PaymentStatus::Paid));
    assert_eq!(PaymentStatus::parse("SUCCEEDED"), Some(PaymentStatus::Paid));
    assert_eq!(PaymentStatus::parse("EXPIRED"), Some(PaymentStatus::Expired));
    assert_eq!(PaymentStatus::parse("REFUNDED"), None);
}

#[test]
fn pending_approval_requires_paid_gated_unapproved() {
    let mut payment = sample_payment();
    assert!(!payment.is_pending_approval());

    payment.requires_approval = true;
    payment.status = PaymentStatus::Paid;
    assert!(payment.is_pending_approval());

    payment.approved_at = Some(Utc::now());
    assert!(!payment.is_pending_approval());
}

#[test]
fn unpaid_gated_payment_is_not_pending_approval() {
    let mut payment = sample_payment();
    payment.requires_approval = true;
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert!(!payment.is_pending_approval());
}

#[test]
fn replayed_checkout_with_same_selection_matches() {
    let payment = sample_payment();
    assert!(replay_matches(&payment, &sample_selection()));
}

#[test]
fn replayed_checkout_with_changed_quantity_does_not_match() {
    let payment = sample_payment();
    let mut selection = sample_selection();
    selection.quantity = 3;
    assert!(!replay_matches(&payment, &selection));
}

#[test]
fn replayed_checkout_with_changed_ticket_fields_does_not_match() {
    let payment = sample_payment();

    let mut selection = sample_selection();
    selection.ticket_type = Some("vip".to_string());
    assert!(!replay_matches(&payment, &selection));

    let mut selection = sample_selection();
    selection.discount_amount_minor = 0;
    assert!(!replay_matches(&payment, &selection));

    let mut selection = sample_selection();
    selection.payment_method = PaymentMethod::Ewallet;
    assert!(!replay_matches(&payment, &selection));
}

fn sample_selection() -> TicketSelection {
    TicketSelection {
        ticket_type: None,
        quantity: 2,
        payment_method: PaymentMethod::VirtualAccount,
        payment_channel: Some("BCA".to_string()),
        attendee_info: serde_json::json!({}),
        discount_code: None,
        discount_amount_minor: 10_000,
        external_id: Some("pay_test".to_string()),
        currency: "IDR".to_string(),
    }
}

fn sample_payment() -> Payment {
    let created = Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap();
    Payment {
        id: Uuid::new_v4(),
        event_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        external_id: "pay_test".to_string(),
        gateway_payment_id: Some("gw_1".to_string()),
        amount_minor: 90_000,
        currency: "IDR".to_string(),
        status: PaymentStatus::Pending,
        payment_method: PaymentMethod::VirtualAccount,
        payment_channel: Some("BCA".to_string()),
        ticket_type: None,
        quantity: 2,
        price_per_ticket_minor: 50_000,
        ticket_number: "TKT7000123".to_string(),
        is_early_bird: false,
        discount_amount_minor: 10_000,
        discount_code: None,
        attendee_info: serde_json::json!({}),
        requires_approval: false,
        approved_at: None,
        approved_by: None,
        expires_at: created + Duration::hours(24),
        paid_at: None,
    }
}
