//! Authenticity check for inbound notifications.

use super::notification::RawNotification;
use super::settings::GatewaySettings;
use super::signature;

/// Recomputes the notification signature and compares it to the one sent.
///
/// The signature field is excluded and the remaining fields are encoded in
/// received order with spaces as `%20`. A missing signature never verifies.
pub fn verify_notification(raw: &RawNotification, settings: &GatewaySettings) -> bool {
    match raw.signature() {
        Some(received) => signature::verify(
            &raw.verification_string(),
            settings.passphrase(),
            received,
        ),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payfast::canonical::{ParameterSet, SpaceEncoding};
    use proptest::prelude::*;

    fn settings() -> GatewaySettings {
        GatewaySettings::new(true, "10000100", "46f0cd694581a", Some("salt".to_string()))
    }

    fn signed_body(fields: &[(&str, &str)], passphrase: Option<&str>) -> String {
        let set = ParameterSet::from_pairs(fields.iter().copied());
        let sig = signature::sign(&set.canonical_string(SpaceEncoding::Percent), passphrase);
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.extend_pairs(fields.iter().copied());
        serializer.append_pair("signature", &sig);
        serializer.finish()
    }

    const FIELDS: &[(&str, &str)] = &[
        ("pf_payment_id", "PF123"),
        ("payment_status", "COMPLETE"),
        ("item_name", "Blue Mug"),
        ("amount_gross", "250.00"),
    ];

    #[test]
    fn accepts_correctly_signed_notification() {
        let body = signed_body(FIELDS, Some("salt"));
        let raw = RawNotification::from_form_body(body.as_bytes());
        assert!(verify_notification(&raw, &settings()));
    }

    #[test]
    fn rejects_notification_signed_with_plus_spaces() {
        let set = ParameterSet::from_pairs(FIELDS.iter().copied());
        let sig = signature::sign(&set.canonical_string(SpaceEncoding::Plus), Some("salt"));
        let mut fields = set.clone();
        fields.push("signature", sig);

        let raw = RawNotification::from_fields(fields);
        assert!(!verify_notification(&raw, &settings()));
    }

    #[test]
    fn rejects_tampered_amount() {
        let body = signed_body(FIELDS, Some("salt")).replace("250.00", "2.50");
        let raw = RawNotification::from_form_body(body.as_bytes());
        assert!(!verify_notification(&raw, &settings()));
    }

    #[test]
    fn rejects_reordered_fields() {
        let sig_body = signed_body(FIELDS, Some("salt"));
        let raw = RawNotification::from_form_body(sig_body.as_bytes());
        let signature = raw.signature().unwrap().to_string();

        let mut reversed: Vec<(&str, &str)> = FIELDS.to_vec();
        reversed.reverse();
        let mut set = ParameterSet::from_pairs(reversed);
        set.push("signature", signature);

        assert!(!verify_notification(&RawNotification::from_fields(set), &settings()));
    }

    #[test]
    fn rejects_missing_signature() {
        let raw = RawNotification::from_form_body(b"pf_payment_id=PF123");
        assert!(!verify_notification(&raw, &settings()));
    }

    proptest! {
        #[test]
        fn verify_accepts_what_was_signed(
            values in prop::collection::vec("[ -~]{1,12}", 1..6),
            salt in proptest::option::of("[a-zA-Z0-9]{1,12}")
        ) {
            let mut set = ParameterSet::new();
            for (i, value) in values.iter().enumerate() {
                set.push(format!("field_{}", i), value.clone());
            }
            let sig = signature::sign(&set.canonical_string(SpaceEncoding::Percent), salt.as_deref());
            set.push("signature", sig);

            let settings = GatewaySettings::new(true, "m", "k", salt);
            prop_assert!(verify_notification(&RawNotification::from_fields(set), &settings));
        }
    }
}
