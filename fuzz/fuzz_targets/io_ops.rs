#![no_main]
use libfuzzer_sys::fuzz_target;
use xe1ap::Io;

fuzz_target!(|ops: Vec<(u8, u8, u8)>| {
    let mut io = Io::new();
    io.reset();

    for (op_type, addr, val) in ops {
        let address = 0xA10000 | (addr as u32 & 0x1F);
        match op_type % 4 {
            0 => {
                io.read(address);
            }
            1 => io.write(address, val),
            2 => {
                let data = io.read_port((val & 1) as usize);
                assert_eq!(data & 0xC0, 0x40);
            }
            3 => io.controller_input().pad[(val & 7) as usize] = (addr as u16) << 4,
            _ => unreachable!(),
        }

        for port in &io.ports {
            assert!(port.xe_1ap.cycle() < 40);
        }
    }
});
