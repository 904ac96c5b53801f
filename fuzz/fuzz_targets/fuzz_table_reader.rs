#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use mqprep::table::{MissingKeyPolicy, Table};

fuzz_target!(|data: &[u8]| {
    // Reading arbitrary bytes must fail gracefully, never panic
    for delimiter in [b'\t', b','] {
        let Ok(table) = Table::from_reader(Cursor::new(data), delimiter) else {
            continue;
        };

        // Whatever parsed must serialize and group without panicking
        let mut out = Vec::new();
        let _ = table.write_csv(&mut out);

        if let Some(key) = table.column_names().next().map(str::to_string) {
            let _ = table.group_by(&key, &MissingKeyPolicy::Sentinel(String::new()));
        }
    }
});
