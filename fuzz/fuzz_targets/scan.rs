#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    plaid_shell::fuzz_scan_bytes(data);
});
