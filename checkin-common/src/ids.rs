//! Identifier and QR payload generation
//!
//! Check-in identifiers are generated client-side: a base-36 encoding of
//! the current Unix millisecond timestamp plus a random base-36 suffix,
//! uppercased, behind a literal `CHK-` prefix. Uniqueness is
//! probabilistic, not guaranteed by a central authority.

use chrono::Utc;
use rand::Rng;
use serde_json::json;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 alphabet is ASCII")
}

/// Generate a collision-resistant check-in identifier
pub fn generate_checkin_id() -> String {
    let timestamp = to_base36(Utc::now().timestamp_millis().max(0) as u64);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..36)] as char)
        .collect();
    format!("CHK-{}-{}", timestamp, suffix).to_uppercase()
}

/// JSON payload embedded in printed QR codes
pub fn qr_code_data(checkin_id: &str) -> String {
    json!({
        "checkinId": checkin_id,
        "timestamp": Utc::now().to_rfc3339(),
        "type": "installer_checkin",
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn checkin_id_has_expected_shape() {
        let id = generate_checkin_id();
        assert!(id.starts_with("CHK-"));
        assert_eq!(id, id.to_uppercase());
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn checkin_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_checkin_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn qr_payload_is_valid_json() {
        let data = qr_code_data("CHK-TEST-ABC123");
        let value: serde_json::Value = serde_json::from_str(&data).unwrap();
        assert_eq!(value["checkinId"], "CHK-TEST-ABC123");
        assert_eq!(value["type"], "installer_checkin");
        assert!(value["timestamp"].is_string());
    }
}
