//! PayFast request signature.
//!
//! The gateway's legacy protocol signs with MD5 over the canonical string,
//! optionally followed by `&passphrase=<salt>`. The passphrase is appended
//! verbatim and is not percent-encoded. Outbound signing and inbound
//! verification share [`sign`].

use subtle::ConstantTimeEq;

/// Computes the lowercase hex MD5 signature of a canonical string.
///
/// An empty passphrase is treated the same as no passphrase.
pub fn sign(canonical: &str, passphrase: Option<&str>) -> String {
    let digest = match passphrase.filter(|p| !p.is_empty()) {
        Some(passphrase) => md5::compute(format!("{}&passphrase={}", canonical, passphrase)),
        None => md5::compute(canonical),
    };
    format!("{:x}", digest)
}

/// Checks a received signature against the one computed locally.
///
/// Hex case is ignored. Comparison is constant-time.
pub fn verify(canonical: &str, passphrase: Option<&str>, received: &str) -> bool {
    let expected = sign(canonical, passphrase);
    let received = received.trim().to_ascii_lowercase();
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
