use super::*;
use proptest::prelude::*;

fn arb_slant() -> impl Strategy<Value = Slant> {
    prop_oneof![Just(Slant::Upright), Just(Slant::Italic), Just(Slant::Oblique)]
}

fn arb_style() -> impl Strategy<Value = FontStyle> {
    (0u16..=1000, 1u8..=9, arb_slant()).prop_map(|(w, n, s)| FontStyle::new(w, n, s))
}

// Every payload shape, including ones that partly or wholly vanish on the
// wire: empty streams, and stream-less payloads at face 0 with no axes
fn arb_payload() -> impl Strategy<Value = Option<FontPayload>> {
    let axes = prop::collection::vec(any::<i32>().prop_map(Fixed::from_bits), 0..6);
    let face_index = prop_oneof![Just(0i32), any::<i32>()];
    let data = prop::option::of(prop::collection::vec(any::<u8>(), 0..256));
    prop::option::of((data, face_index, axes)).prop_map(|payload| {
        payload.map(|(data, face_index, axes)| match data {
            Some(bytes) => FontPayload::new(FontStream::from(bytes), face_index, &axes),
            None => FontPayload::without_stream(face_index, &axes),
        })
    })
}

fn arb_descriptor() -> impl Strategy<Value = FontDescriptor> {
    (
        "\\PC{0,24}",
        "\\PC{0,24}",
        "[A-Za-z0-9-]{0,24}",
        arb_style(),
        arb_payload(),
    )
        .prop_map(|(family, full, postscript, style, payload)| {
            let desc = FontDescriptor::new(family, style)
                .with_full_name(full)
                .with_postscript_name(postscript);
            match payload {
                Some(payload) => desc.with_payload(payload),
                None => desc,
            }
        })
}

// Property: every descriptor survives a full write and read
proptest! {
    #[test]
    fn prop_descriptor_round_trips(desc in arb_descriptor(), policy in prop::sample::select(FingerprintPolicy::ALL.to_vec())) {
        let options = CodecOptions::default().with_policy(policy);
        let mut bytes = Vec::new();
        let outcome = serialize(&mut desc.clone(), &mut bytes, &mut EncodeCache::new(), &options).unwrap();
        prop_assert!(!outcome.is_reference());

        let mut source = bytes.as_slice();
        let decoded = deserialize(&mut source, &mut DecodeCache::new(), &options).unwrap();
        prop_assert_eq!(decoded, desc.to_wire_form());
        prop_assert!(source.is_empty());
    }
}

// Property: packed style bits unpack to the same style
proptest! {
    #[test]
    fn prop_style_bits_round_trip(style in arb_style()) {
        prop_assert_eq!(FontStyle::from_wire(u64::from(style.to_bits())), style);
    }
}

// Property: decoding any style bits yields a style inside the valid ranges
proptest! {
    #[test]
    fn prop_decoded_style_is_clamped(bits in any::<u64>()) {
        let style = FontStyle::from_wire(bits);
        prop_assert!(style.weight() <= FontStyle::MAX_WEIGHT);
        prop_assert!((1..=9).contains(&style.width()));
    }
}

// Property: a sequence with repeats decodes to the same sequence
proptest! {
    #[test]
    fn prop_stream_with_repeats_round_trips(
        pool in prop::collection::vec(arb_descriptor(), 1..5),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..20),
    ) {
        let sequence: Vec<FontDescriptor> = picks.iter().map(|i| i.get(&pool).clone()).collect();

        let mut writer = DescriptorWriter::new(Vec::new(), CodecOptions::default());
        for desc in &sequence {
            writer.write(&mut desc.clone()).unwrap();
        }
        let stats = writer.stats();
        prop_assert_eq!(stats.full_records + stats.references, sequence.len() as u64);

        let bytes = writer.into_inner();
        let reader = DescriptorReader::new(bytes.as_slice(), CodecOptions::default());
        let decoded = reader.collect::<Result<Vec<_>>>().unwrap();
        let expected: Vec<FontDescriptor> = sequence.iter().map(FontDescriptor::to_wire_form).collect();
        prop_assert_eq!(decoded, expected);
    }
}

// Property: writing one instance again and again yields a readable stream;
// the first write carries the font data, later ones what it left behind
proptest! {
    #[test]
    fn prop_same_instance_repeated_round_trips(
        desc in arb_descriptor(),
        times in 2usize..5,
        policy in prop::sample::select(FingerprintPolicy::ALL.to_vec()),
    ) {
        let options = CodecOptions::default().with_policy(policy);
        let first = desc.to_wire_form();
        let mut instance = desc;

        let mut writer = DescriptorWriter::new(Vec::new(), options.clone());
        for _ in 0..times {
            writer.write(&mut instance).unwrap();
        }
        prop_assert!(writer.stats().references >= times as u64 - 2);
        let rest = instance.to_wire_form();

        let bytes = writer.into_inner();
        let reader = DescriptorReader::new(bytes.as_slice(), options);
        let decoded = reader.collect::<Result<Vec<_>>>().unwrap();
        prop_assert_eq!(decoded.len(), times);
        prop_assert_eq!(&decoded[0], &first);
        for later in &decoded[1..] {
            prop_assert_eq!(later, &rest);
        }
    }
}

// Property: arbitrary bytes never panic the decoder
proptest! {
    #[test]
    fn prop_garbage_is_an_error_not_a_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let options = CodecOptions::default().with_max_font_data_len(1024);
        for item in DescriptorReader::new(bytes.as_slice(), options) {
            if item.is_err() {
                break;
            }
        }
    }
}

// Property: varUints read back what was written and use the predicted length
proptest! {
    #[test]
    fn prop_var_uint_round_trips(value in any::<u64>()) {
        let mut out = Vec::new();
        codec::write_var_uint(&mut out, value).unwrap();
        prop_assert_eq!(out.len(), codec::var_uint_len(value));
        prop_assert_eq!(codec::read_var_uint(&mut out.as_slice()).unwrap(), value);
    }
}
