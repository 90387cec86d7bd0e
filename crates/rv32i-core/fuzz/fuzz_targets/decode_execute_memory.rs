#![no_main]

use libfuzzer_sys::fuzz_target;
use rv32i_core::{disassemble, Decoder, Hart, HartConfig, Memory};

const MEMORY_SIZE: u32 = 0x400;
const TICK_LIMIT: u64 = 4096;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 4 {
        let word = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let _ = Decoder::decode(word);
    }

    let mut memory = Memory::new(MEMORY_SIZE);
    let _ = memory.load_image(data);
    let _ = disassemble(&memory);

    let mut hart = Hart::with_config(
        &mut memory,
        HartConfig {
            show_instructions: true,
            show_registers: false,
        },
    );
    let _ = hart.run(Some(TICK_LIMIT), &mut std::io::sink());
    let _ = hart.dump("");
});
