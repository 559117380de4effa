use paycard_payment::{
    detect_network, format_card_number, validate_card_number, validate_cvc, Network,
};
use paycard_test_fixtures::cards;

#[test]
fn every_sample_is_detected_and_valid() {
    let samples = cards::samples("samples").expect("samples fixture");
    assert!(!samples.is_empty());
    for s in samples {
        let expected = Network::from_id(&s.network).expect("known network id");
        assert_eq!(detect_network(&s.number), expected, "number {}", s.number);
        assert!(validate_card_number(&s.number), "number {}", s.number);
    }
}

#[test]
fn samples_format_to_network_grouping() {
    for s in cards::samples("samples").unwrap() {
        let Some(formatted) = s.formatted else {
            continue;
        };
        assert_eq!(format_card_number(&s.number), formatted);
        // Formatting is stable and still validates.
        assert_eq!(format_card_number(&formatted), formatted);
        assert!(validate_card_number(&formatted));
    }
}

#[test]
fn invalid_samples_are_rejected() {
    for s in cards::samples("invalid").unwrap() {
        assert!(
            !validate_card_number(&s.number),
            "{} should fail ({:?})",
            s.number,
            s.reason
        );
    }
}

#[test]
fn detection_is_progressive() {
    let typed = "378282246310005";
    let seen: Vec<Network> = (1..=typed.len())
        .map(|n| detect_network(&typed[..n]))
        .collect();
    assert_eq!(seen[0], Network::Unknown);
    assert!(seen[1..].iter().all(|n| *n == Network::Amex));
}

#[test]
fn cvc_rules_follow_detected_network() {
    let amex = detect_network("3782");
    let visa = detect_network("4242");
    assert!(validate_cvc("1234", amex));
    assert!(!validate_cvc("1234", visa));
    assert!(validate_cvc("123", visa));
}
