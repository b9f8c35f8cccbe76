#![no_main]

use libfuzzer_sys::fuzz_target;
use wirepool::Address;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(addr) = input.parse::<Address>() {
        // Display output must parse back to the same address
        let reparsed: Address = addr.to_string().parse().expect("display round-trip");
        assert_eq!(reparsed, addr);
    }

    let _ = Address::parse_list(input, 9042);
});
