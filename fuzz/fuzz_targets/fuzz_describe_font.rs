//! Fuzz the typeface provider with arbitrary font files
//!
//! Whatever parses as a font must describe without panicking, and an
//! embedded descriptor must rebuild a typeface from its payload.

#![no_main]

use fontdesc_fontdb::Typeface;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Skip very small inputs that can't be valid fonts
    if data.len() < 12 {
        return;
    }

    for index in 0..3u32 {
        let Ok(typeface) = Typeface::from_data_index(data.to_vec(), index) else {
            continue;
        };
        let _ = typeface.axis_count();

        if let Ok(mut descriptor) = typeface.descriptor(true) {
            if let Some(payload) = descriptor.payload_mut() {
                let _ = Typeface::from_payload(payload);
            }
        }
    }
});
