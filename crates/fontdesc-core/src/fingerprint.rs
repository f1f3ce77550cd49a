//! Fingerprints: how the dedup caches recognize a descriptor they have seen
//!
//! A fingerprint is a pure function of descriptor content. Both ends of a
//! stream must use the same [`FingerprintPolicy`], because the decoder
//! recomputes the key of every full record it reads and resolves later
//! reference records against it.
//!
//! | policy | key | collides when |
//! |---|---|---|
//! | [`FingerprintPolicy::ContentHash`] | FNV-1a over family, style, data length | name, style and data length agree |
//! | [`FingerprintPolicy::FamilyName`] | the family name | any two faces of one family |
//! | [`FingerprintPolicy::Full`] | FNV-1a over every identifying field and the data bytes | only on a 64-bit hash collision |
//!
//! FNV is used instead of `std`'s `DefaultHasher` because its output is
//! fixed across Rust releases and platforms; a stream written today must
//! resolve its references when read by a later build. Integers are always
//! hashed as little-endian bytes for the same reason.

use std::fmt;
use std::hash::Hasher;
use std::io::{Read, Write};
use std::str::FromStr;

use fnv::FnvHasher;

use crate::codec::{read_string_for, read_var_uint_for, write_string, write_var_uint};
use crate::descriptor::FontDescriptor;
use crate::error::{DescriptorError, Result};

/// Key under which a descriptor is cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FingerprintKey {
    Hash(u64),
    Name(String),
}

impl FingerprintKey {
    /// Write the key body of a reference record
    pub fn write<W: Write + ?Sized>(&self, sink: &mut W) -> Result<()> {
        match self {
            FingerprintKey::Hash(hash) => write_var_uint(sink, *hash),
            FingerprintKey::Name(name) => write_string(sink, name),
        }
    }
}

impl fmt::Display for FingerprintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintKey::Hash(hash) => write!(f, "#{hash:016x}"),
            FingerprintKey::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// Which descriptor fields decide whether two descriptors are "the same"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FingerprintPolicy {
    /// Family name, packed style and font data length
    ContentHash,
    /// Family name only; distinct faces of one family collide
    FamilyName,
    /// Every name, style, face index, axis value and the font data bytes
    #[default]
    Full,
}

impl FingerprintPolicy {
    pub const ALL: [FingerprintPolicy; 3] = [
        FingerprintPolicy::ContentHash,
        FingerprintPolicy::FamilyName,
        FingerprintPolicy::Full,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FingerprintPolicy::ContentHash => "content-hash",
            FingerprintPolicy::FamilyName => "family-name",
            FingerprintPolicy::Full => "full",
        }
    }

    /// Compute the cache key for `descriptor`
    pub fn fingerprint(self, descriptor: &FontDescriptor) -> FingerprintKey {
        match self {
            FingerprintPolicy::ContentHash => {
                let mut hasher = FnvHasher::default();
                hash_bytes(&mut hasher, descriptor.family_name().as_bytes());
                hasher.write(&descriptor.style().to_bits().to_le_bytes());
                if let Some(len) = descriptor.payload().and_then(|p| p.stream_len()) {
                    hasher.write(&len.to_le_bytes());
                }
                FingerprintKey::Hash(hasher.finish())
            }
            FingerprintPolicy::FamilyName => {
                FingerprintKey::Name(descriptor.family_name().to_string())
            }
            FingerprintPolicy::Full => FingerprintKey::Hash(full_hash(descriptor)),
        }
    }

    /// Read the key body of a reference record
    pub fn read_key<R: Read + ?Sized>(self, source: &mut R) -> Result<FingerprintKey> {
        match self {
            FingerprintPolicy::ContentHash | FingerprintPolicy::Full => Ok(FingerprintKey::Hash(
                read_var_uint_for(source, "cache reference")?,
            )),
            FingerprintPolicy::FamilyName => Ok(FingerprintKey::Name(read_string_for(
                source,
                "cache reference",
            )?)),
        }
    }
}

impl fmt::Display for FingerprintPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FingerprintPolicy {
    type Err = DescriptorError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        FingerprintPolicy::ALL
            .into_iter()
            .find(|policy| policy.name() == wanted)
            .ok_or_else(|| {
                DescriptorError::Config(format!(
                    "unknown fingerprint policy '{s}' (expected content-hash, family-name or full)"
                ))
            })
    }
}

/// Length-delimited so ("ab", "c") and ("a", "bc") hash apart
fn hash_bytes(hasher: &mut FnvHasher, bytes: &[u8]) {
    hasher.write(&(bytes.len() as u64).to_le_bytes());
    hasher.write(bytes);
}

fn full_hash(descriptor: &FontDescriptor) -> u64 {
    let mut hasher = FnvHasher::default();
    hash_bytes(&mut hasher, descriptor.family_name().as_bytes());
    hash_bytes(&mut hasher, descriptor.full_name().as_bytes());
    hash_bytes(&mut hasher, descriptor.postscript_name().as_bytes());
    hasher.write(&descriptor.style().to_bits().to_le_bytes());

    match descriptor.payload() {
        Some(payload) => {
            hasher.write(&[1]);
            hasher.write(&payload.face_index().to_le_bytes());
            hasher.write(&(payload.axis_count() as u64).to_le_bytes());
            for axis in payload.axis_values() {
                hasher.write(&axis.to_bits().to_le_bytes());
            }
            match payload.stream() {
                Some(stream) => {
                    hasher.write(&[1]);
                    hash_bytes(&mut hasher, stream.as_bytes());
                }
                None => hasher.write(&[0]),
            }
        }
        None => hasher.write(&[0]),
    }

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{FontPayload, FontStream};
    use crate::style::FontStyle;
    use read_fonts::types::Fixed;
    use std::io::Cursor;

    fn regular() -> FontDescriptor {
        FontDescriptor::new("Roboto", FontStyle::NORMAL)
            .with_full_name("Roboto Regular")
            .with_postscript_name("Roboto-Regular")
    }

    #[test]
    fn test_policies_are_deterministic() {
        for policy in FingerprintPolicy::ALL {
            assert_eq!(policy.fingerprint(&regular()), policy.fingerprint(&regular()));
        }
    }

    #[test]
    fn test_full_sees_every_field() {
        let base = FingerprintPolicy::Full.fingerprint(&regular());

        let variants = [
            regular().with_full_name("Roboto Book"),
            regular().with_postscript_name("Roboto-Book"),
            {
                let mut d = regular();
                d.set_style(FontStyle::BOLD);
                d
            },
            regular().with_payload(FontPayload::without_stream(1, &[])),
            regular().with_payload(FontPayload::without_stream(0, &[Fixed::from_i32(300)])),
            regular().with_payload(FontPayload::new(FontStream::from(vec![1, 2]), 0, &[])),
        ];
        for variant in &variants {
            assert_ne!(FingerprintPolicy::Full.fingerprint(variant), base, "{variant:?}");
        }
    }

    #[test]
    fn test_full_distinguishes_payload_bytes_of_equal_length() {
        let a = regular().with_payload(FontPayload::new(FontStream::from(vec![1, 2]), 0, &[]));
        let b = regular().with_payload(FontPayload::new(FontStream::from(vec![2, 1]), 0, &[]));
        assert_ne!(
            FingerprintPolicy::Full.fingerprint(&a),
            FingerprintPolicy::Full.fingerprint(&b)
        );
        // The length-only policy cannot tell them apart
        assert_eq!(
            FingerprintPolicy::ContentHash.fingerprint(&a),
            FingerprintPolicy::ContentHash.fingerprint(&b)
        );
    }

    #[test]
    fn test_full_ignores_stream_position() {
        let mut a = regular().with_payload(FontPayload::new(FontStream::from(vec![1, 2]), 0, &[]));
        let before = FingerprintPolicy::Full.fingerprint(&a);
        let mut byte = [0u8; 1];
        a.payload_mut()
            .unwrap()
            .stream_mut()
            .unwrap()
            .read_exact(&mut byte)
            .unwrap();
        assert_eq!(FingerprintPolicy::Full.fingerprint(&a), before);
    }

    #[test]
    fn test_content_hash_ignores_names_other_than_family() {
        let a = regular();
        let b = regular().with_full_name("Something Else");
        assert_eq!(
            FingerprintPolicy::ContentHash.fingerprint(&a),
            FingerprintPolicy::ContentHash.fingerprint(&b)
        );
    }

    #[test]
    fn test_family_name_key() {
        assert_eq!(
            FingerprintPolicy::FamilyName.fingerprint(&regular()),
            FingerprintKey::Name("Roboto".to_string())
        );
    }

    #[test]
    fn test_key_wire_form_matches_policy() {
        for policy in FingerprintPolicy::ALL {
            let key = policy.fingerprint(&regular());
            let mut out = Vec::new();
            key.write(&mut out).unwrap();
            assert_eq!(policy.read_key(&mut Cursor::new(out)).unwrap(), key);
        }
    }

    #[test]
    fn test_policy_names_parse() {
        for policy in FingerprintPolicy::ALL {
            assert_eq!(policy.to_string().parse::<FingerprintPolicy>().unwrap(), policy);
        }
        assert_eq!(
            " Family-Name ".parse::<FingerprintPolicy>().unwrap(),
            FingerprintPolicy::FamilyName
        );
        assert!(matches!(
            "sha256".parse::<FingerprintPolicy>(),
            Err(DescriptorError::Config(_))
        ));
    }
}
