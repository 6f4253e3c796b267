#![no_main]

use libfuzzer_sys::fuzz_target;
use tagval::instruction::{Instruction, Target, parse_int_literal};
use tagval::registry;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let _ = parse_int_literal(&s);

    let instruction = Instruction::parse(&s);
    if let Target::Checker(name) = instruction.target {
        let _ = registry::global().build(name, &instruction.options);
    }
});
