#![no_main]
use extended_properties::{Format, PropertyStore, DELIMITER_SENTINEL_KEY};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must never panic a reader, and a failed load must leave
// the store untouched
fuzz_target!(|data: &[u8]| {
    for format in [Format::Properties, Format::Xml, Format::Json, Format::Toml] {
        let mut props = PropertyStore::new();
        props.set("existing", "1");

        match props.load(data, format) {
            Ok(()) => {
                assert!(!props.contains_key(DELIMITER_SENTINEL_KEY));
                let _ = props.store_to_string(format, None);
            }
            Err(_) => {
                assert_eq!(props.len(), 1);
                assert_eq!(props.get("existing"), Some("1"));
            }
        }
    }
});
