//! Tests for stable-id sequencing.

use nmclient::next_stable_id;

#[test]
fn test_increments_numeric_suffix() {
    assert_eq!(next_stable_id("foo-3"), "foo-4");
    assert_eq!(next_stable_id("x-9"), "x-10");
    assert_eq!(next_stable_id("office-0"), "office-1");
}

#[test]
fn test_appends_suffix_when_missing() {
    assert_eq!(next_stable_id("foo"), "foo-1");
    assert_eq!(next_stable_id(""), "-1");
    assert_eq!(next_stable_id("foo-bar"), "foo-bar-1");
}

#[test]
fn test_prefix_is_greedy() {
    assert_eq!(next_stable_id("foo-bar-2"), "foo-bar-3");
    assert_eq!(next_stable_id("a-1-2-3"), "a-1-2-4");
}

#[test]
fn test_large_numbers_do_not_overflow() {
    assert_eq!(
        next_stable_id("a-99999999999999999999"),
        "a-100000000000000000000"
    );
    assert_eq!(
        next_stable_id("a-18446744073709551615"),
        "a-18446744073709551616"
    );
}

#[test]
fn test_repeated_bumps_form_a_sequence() {
    let mut id = String::from("lab");
    for expected in ["lab-1", "lab-2", "lab-3"] {
        id = next_stable_id(&id);
        assert_eq!(id, expected);
    }
}
