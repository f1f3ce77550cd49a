//! Wire Format Tests
//!
//! Byte-exact checks of what the encoder writes and what the decoder
//! accepts, including streams written by older encoders.

use fontdesc_core::{
    deserialize, serialize, CodecOptions, DecodeCache, DescriptorError, EncodeCache,
    FingerprintPolicy, Fixed, FontDescriptor, FontPayload, FontStream, FontStyle, RecordTag,
    Slant,
};

/// Regular weight, normal width, upright: 0x0190_0500
const NORMAL_STYLE: [u8; 4] = [0x80, 0x8a, 0xc0, 0x0c];

fn encode(desc: &FontDescriptor) -> Vec<u8> {
    let mut out = Vec::new();
    serialize(
        &mut desc.clone(),
        &mut out,
        &mut EncodeCache::new(),
        &CodecOptions::default(),
    )
    .unwrap();
    out
}

fn decode(bytes: &[u8]) -> fontdesc_core::Result<FontDescriptor> {
    let mut source = bytes;
    deserialize(&mut source, &mut DecodeCache::new(), &CodecOptions::default())
}

// ============================================================================
// Encoder output
// ============================================================================

#[test]
fn test_family_only_layout() {
    let bytes = encode(&FontDescriptor::new("A", FontStyle::NORMAL));

    let mut expected = NORMAL_STYLE.to_vec();
    expected.extend_from_slice(&[0x01, 0x01, b'A', 0xFF, 0x00]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_empty_descriptor_is_style_sentinel_and_zero() {
    let bytes = encode(&FontDescriptor::default());

    let mut expected = NORMAL_STYLE.to_vec();
    expected.extend_from_slice(&[0xFF, 0x00]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_bold_italic_style_bits() {
    let bytes = encode(&FontDescriptor::new("", FontStyle::BOLD_ITALIC));
    assert_eq!(&bytes[..4], &[0x81, 0x8a, 0xf0, 0x15]);
}

#[test]
fn test_records_follow_tag_order() {
    let desc = FontDescriptor::new("F", FontStyle::NORMAL)
        .with_full_name("G")
        .with_postscript_name("P")
        .with_payload(FontPayload::new(
            FontStream::from(vec![0xAA, 0xBB]),
            -1,
            &[Fixed::from_i32(1)],
        ));
    let bytes = encode(&desc);

    let mut expected = NORMAL_STYLE.to_vec();
    expected.extend_from_slice(&[0x01, 0x01, b'F']);
    expected.extend_from_slice(&[0x04, 0x01, b'G']);
    expected.extend_from_slice(&[0x06, 0x01, b'P']);
    // Face index -1 travels as its u32 bit pattern
    expected.extend_from_slice(&[0xFD, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    // One axis at 1.0 (0x0001_0000)
    expected.extend_from_slice(&[0xFC, 0x01, 0x80, 0x80, 0x04]);
    expected.extend_from_slice(&[0xFF, 0x02, 0xAA, 0xBB]);
    assert_eq!(bytes, expected);

    assert_eq!(decode(&bytes).unwrap(), desc);
}

#[test]
fn test_reference_layout() {
    let desc = FontDescriptor::new("Repeat", FontStyle::NORMAL);
    let options = CodecOptions::default();
    let mut cache = EncodeCache::new();

    let mut first = Vec::new();
    serialize(&mut desc.clone(), &mut first, &mut cache, &options).unwrap();
    let mut second = Vec::new();
    let outcome = serialize(&mut desc.clone(), &mut second, &mut cache, &options).unwrap();

    let mut expected = NORMAL_STYLE.to_vec();
    expected.push(RecordTag::CacheReference.to_byte());
    outcome.key().write(&mut expected).unwrap();
    assert_eq!(second, expected);
    assert_eq!(*outcome.key(), FingerprintPolicy::Full.fingerprint(&desc));
}

// ============================================================================
// Decoder input
// ============================================================================

#[test]
fn test_legacy_style_and_file_name() {
    // Old encoders wrote 2-bit styles and a file name record
    let bytes = [
        0x01, 0x01, 0x03, b'A', b'b', b'c', 0xFE, 0x02, b'x', b'y', 0xFF, 0x00,
    ];
    let desc = decode(&bytes).unwrap();

    assert_eq!(desc.family_name(), "Abc");
    assert_eq!(desc.style(), FontStyle::BOLD);
    assert!(!desc.has_payload());
}

#[test]
fn test_unknown_slant_decodes_as_oblique() {
    let bits: u32 = (500 << 16) | (5 << 8) | 7;
    let mut bytes = Vec::new();
    fontdesc_core::codec::write_var_uint(&mut bytes, u64::from(bits)).unwrap();
    bytes.extend_from_slice(&[0xFF, 0x00]);

    let style = decode(&bytes).unwrap().style();
    assert_eq!(style.weight(), 500);
    assert_eq!(style.slant(), Slant::Oblique);
}

#[test]
fn test_face_index_without_data_keeps_payload() {
    let mut bytes = NORMAL_STYLE.to_vec();
    bytes.extend_from_slice(&[0xFD, 0x03, 0xFF, 0x00]);

    let desc = decode(&bytes).unwrap();
    let payload = desc.payload().unwrap();
    assert_eq!(payload.face_index(), 3);
    assert!(!payload.has_stream());
}

#[test]
fn test_malformed_inputs() {
    let cases: Vec<(Vec<u8>, fn(&DescriptorError) -> bool)> = vec![
        (vec![], |e| matches!(e, DescriptorError::TruncatedInput { .. })),
        (vec![0x00, 0x02], |e| {
            matches!(e, DescriptorError::UnknownRecordTag(0x02))
        }),
        (vec![0x00, 0x01, 0x05, b'a'], |e| {
            matches!(e, DescriptorError::TruncatedInput { .. })
        }),
        (vec![0x00, 0xFF, 0x04, 0x01, 0x02], |e| {
            matches!(
                e,
                DescriptorError::TrailingBlobReadMismatch {
                    expected: 4,
                    actual: 2
                }
            )
        }),
        (vec![0x00, 0x01, 0x02, 0xC3, 0x28, 0xFF, 0x00], |e| {
            matches!(e, DescriptorError::InvalidName(_))
        }),
        (vec![0x00, 0xFB, 0x2A], |e| {
            matches!(e, DescriptorError::DanglingCacheReference(_))
        }),
        (vec![0x80; 11], |e| matches!(e, DescriptorError::VarUintOverflow)),
    ];

    for (bytes, check) in cases {
        let err = decode(&bytes).unwrap_err();
        assert!(check(&err), "{bytes:02x?} gave {err:?}");
        assert!(err.is_malformed_input(), "{err:?}");
    }
}
