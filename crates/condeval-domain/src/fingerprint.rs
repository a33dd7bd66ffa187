use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a failed check.
///
/// Identity fields:
/// - check_id
/// - code
/// - scenario name (empty for template structure checks)
/// - subject (the check name, unique within its list)
pub fn fingerprint_for_check(check_id: &str, code: &str, scenario: &str, subject: &str) -> String {
    let canonical = [check_id, code, scenario, subject].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_field_sensitive() {
        let a = fingerprint_for_check("scenario.feature", "feature_mismatch", "KMS", "feature encryption");
        let b = fingerprint_for_check("scenario.feature", "feature_mismatch", "KMS", "feature encryption");
        let c = fingerprint_for_check("scenario.feature", "feature_mismatch", "Minimal", "feature encryption");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
