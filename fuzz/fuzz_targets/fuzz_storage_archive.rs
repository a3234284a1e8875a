#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use msalign::storage::DataBaseStorage;

fuzz_target!(|data: &[u8]| {
    // Damaged archives load as empty storages; nothing may panic
    let _ = DataBaseStorage::load_from(Cursor::new(data));
    let _ = DataBaseStorage::read_summaries(Cursor::new(data));
});
