use base64::Engine;
use digest::Update;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use jio_error::{PackageManagerError, Result};

/// An SRI string's algorithm prefix, dispatching to the matching hasher.
/// `sha512` is what the registry declares in practice; `sha1`/`sha256` are
/// accepted for legacy or third-party registries (spec §4.4/§6).
pub enum AnyDigest {
    Sha512(Sha512),
    Sha256(Sha256),
    Sha1(Sha1),
}

impl AnyDigest {
    #[must_use]
    pub fn for_algorithm(algo: &str) -> Option<Self> {
        match algo {
            "sha512" => Some(Self::Sha512(Sha512::new())),
            "sha256" => Some(Self::Sha256(Sha256::new())),
            "sha1" => Some(Self::Sha1(Sha1::new())),
            _ => None,
        }
    }

    #[must_use]
    pub fn finalize_base64(self) -> String {
        let bytes = match self {
            Self::Sha512(h) => h.finalize().to_vec(),
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha1(h) => h.finalize().to_vec(),
        };
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }
}

impl Update for AnyDigest {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha512(h) => Digest::update(h, data),
            Self::Sha256(h) => Digest::update(h, data),
            Self::Sha1(h) => Digest::update(h, data),
        }
    }
}

/// Split an SRI string `<algo>-<base64>` into its parts.
pub fn split_sri(sri: &str) -> Result<(&str, &str)> {
    sri.split_once('-')
        .ok_or_else(|| PackageManagerError::Integrity(sri.to_string(), String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_algorithm_and_digest() {
        let (algo, digest) = split_sri("sha512-abc123==").expect("splits");
        assert_eq!(algo, "sha512");
        assert_eq!(digest, "abc123==");
    }

    #[test]
    fn rejects_sri_without_separator() {
        assert!(split_sri("not-a-hyphenless-sri-but-no-digest-part").is_ok());
        assert!(split_sri("nohyphen").is_err());
    }

    #[test]
    fn unsupported_algorithm_is_none() {
        assert!(AnyDigest::for_algorithm("md5").is_none());
    }

    #[test]
    fn sha512_digest_is_deterministic() {
        let mut a = AnyDigest::for_algorithm("sha512").expect("sha512");
        a.update(b"left-pad");
        let mut b = AnyDigest::for_algorithm("sha512").expect("sha512");
        b.update(b"left-pad");
        assert_eq!(a.finalize_base64(), b.finalize_base64());
    }
}
