#![no_main]

use connect_four_client::protocol::{decode, encode_snapshot};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = decode(raw) else {
        return;
    };

    // Whatever decodes must satisfy the snapshot invariant and survive
    // re-encoding unchanged.
    assert!(snapshot.winning_cells.is_empty() || snapshot.is_over);
    assert_eq!(decode(&encode_snapshot(&snapshot)).ok(), Some(snapshot));
});
