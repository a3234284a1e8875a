#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed libraries must fail with an error, never panic
    if let Ok(references) = msalign::reference::read_msp(Cursor::new(data)) {
        for (i, reference) in references.iter().enumerate() {
            assert_eq!(reference.scan_id, i);
        }
    }

    let _ = msalign::reference::read_text_db(Cursor::new(data));
});
