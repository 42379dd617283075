#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    na_inspect_fuzz::test_binary(data);
    na_inspect_fuzz::test_json(data);
    na_inspect_fuzz::test_tree(data);
});
