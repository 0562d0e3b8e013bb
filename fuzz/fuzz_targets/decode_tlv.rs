#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::{Ber, Legacy, Mode, Tlv};

fuzz_target!(|data: &[u8]| {
    let lossy = Ber::decode(data);
    assert!(!lossy.is_empty());

    if let Ok(strict) = Ber::try_decode(data) {
        assert_eq!(strict, lossy);
    }

    // Every value is exactly as long as its length says.
    let legacy = Legacy::decode(data);
    let mut pending: Vec<&Tlv> = legacy.iter().collect();
    while let Some(node) = pending.pop() {
        if let Some(value) = node.value() {
            assert_eq!(value.len() as u64, u64::from(node.length()));
        }
        let _ = legacy.tag_class(node.tag());
        pending.extend(node.children().iter());
    }
});
