//! Fuzz the descriptor decoder with arbitrary streams
//!
//! Malformed input must end in an error, never a panic, an unbounded
//! allocation or a hang. Every descriptor that does decode must encode and
//! decode again to itself.
//!
//! The first byte picks the fingerprint policy so references are exercised
//! under all three.

#![no_main]

use fontdesc_core::{
    deserialize, serialize, CodecOptions, DecodeCache, DescriptorReader, EncodeCache,
    FingerprintPolicy,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, stream)) = data.split_first() else {
        return;
    };
    let policy = FingerprintPolicy::ALL[usize::from(selector) % FingerprintPolicy::ALL.len()];
    let options = CodecOptions::default()
        .with_policy(policy)
        .with_max_font_data_len(1 << 20)
        .with_cache_capacity(Some(usize::from(selector >> 2) + 1));

    for descriptor in DescriptorReader::new(stream, options.clone()) {
        let Ok(descriptor) = descriptor else {
            break;
        };

        let mut bytes = Vec::new();
        let mut copy = descriptor.clone();
        serialize(&mut copy, &mut bytes, &mut EncodeCache::new(), &options)
            .expect("decoded descriptors re-encode");
        let again = deserialize(&mut bytes.as_slice(), &mut DecodeCache::new(), &options)
            .expect("re-encoded descriptors decode");
        assert_eq!(again, descriptor);
    }
});
