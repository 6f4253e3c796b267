#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagval::{Unit, registry, validate_unit};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    instruction: &'a str,
    required: bool,
    array_depth: u8,
    json: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(input.json) else {
        return;
    };
    let instruction = tagval::instruction::Instruction::parse(input.instruction);
    let tagval::instruction::Target::Checker(name) = instruction.target else {
        return;
    };
    let Ok(checker) = registry::global().build(name, &instruction.options) else {
        return;
    };

    let unit = Unit::new(&value)
        .with_checker(checker.as_ref())
        .with_required(input.required)
        .with_array_depth(input.array_depth % 8);
    let first = validate_unit(Some(&unit));
    assert_eq!(first, validate_unit(Some(&unit)));
});
