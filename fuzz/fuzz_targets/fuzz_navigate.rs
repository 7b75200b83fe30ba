#![no_main]

use jsonprobe::{find, find_key, list_pointers, simple_unmarshal, KeyState};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = simple_unmarshal(data);
    let _ = find_key(data, "a");

    let mut state = KeyState::new(data);
    let _ = state.find_key("a");
    let _ = state.find_key("b");

    if let Ok(pointers) = list_pointers(data) {
        for p in pointers.iter().take(64) {
            let _ = find(data, p);
        }
    }
});
