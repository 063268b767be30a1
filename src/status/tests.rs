use super::*;

#[test]
fn test_fresh_message_is_current() {
    let mut bar = MessageBar::new();
    bar.set("saved");
    assert_eq!(bar.current(), Some("saved"));
}

#[test]
fn test_set_replaces_previous_message() {
    let mut bar = MessageBar::new();
    bar.set("first");
    bar.set("second");
    assert_eq!(bar.current(), Some("second"));
}

#[test]
fn test_expiry_is_time_based() {
    let msg = Message::new("x");
    let now = Instant::now();
    assert!(!msg.is_expired(now));
    assert!(msg.is_expired(now + Duration::from_millis(MESSAGE_TIMEOUT_MS + 1)));
}

#[test]
fn test_prune_reports_transition_once() {
    let mut bar = MessageBar::new();
    assert!(!bar.prune_expired(), "empty bar has nothing to prune");
    bar.set("x");
    assert!(!bar.prune_expired(), "fresh message survives");
    bar.clear();
    assert_eq!(bar.current(), None);
}
