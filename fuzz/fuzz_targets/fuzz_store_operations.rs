#![no_main]
use arbitrary::Arbitrary;
use extended_properties::PropertyStore;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Operation {
    Set { key: String, value: String },
    Remove { key: String },
    SetArray { key: String, values: Vec<String> },
    GetArray { key: String },
    SetDelimiter { delimiter: char },
    AddPrefix { prefix: String },
    ExtractPrefix { prefix: String },
    Split { include_unprefixed: bool },
}

fuzz_target!(|ops: Vec<Operation>| {
    let mut props = PropertyStore::new();

    for op in ops.into_iter().take(64) {
        match op {
            Operation::Set { key, value } => {
                props.set(key, value);
            }
            Operation::Remove { key } => {
                props.remove(&key);
            }
            Operation::SetArray { key, values } => {
                if props.set_array(key.clone(), &values).is_ok() && !values.is_empty() {
                    assert_eq!(props.get_array(&key).unwrap(), values);
                }
            }
            Operation::GetArray { key } => {
                let _ = props.get_array(&key);
            }
            Operation::SetDelimiter { delimiter } => {
                let before = props.clone();
                if let Ok(false) = props.set_delimiter(delimiter) {
                    assert_eq!(props, before);
                }
            }
            Operation::AddPrefix { prefix } => {
                let len = props.len();
                if props.add_prefix(&prefix).is_ok() {
                    assert_eq!(props.len(), len);
                }
            }
            Operation::ExtractPrefix { prefix } => {
                let _ = props.extract_prefix(&prefix);
            }
            Operation::Split { include_unprefixed } => {
                let groups = props.split_by_prefix(include_unprefixed);
                let total: usize = groups.values().map(PropertyStore::len).sum();
                if include_unprefixed {
                    assert_eq!(total, props.len());
                }
            }
        }
    }
});
