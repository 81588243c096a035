use std::time::Instant;
use xe1ap::io::xe_1ap::TH;
use xe1ap::Io;

fn main() {
    let mut io = Io::new();
    io.reset();
    io.write(0xA10009, TH);

    let start = Instant::now();
    let mut checksum = 0u32;
    for frame in 0..1_000_000u32 {
        io.controller_input().set_stick(0, frame as u8, (frame >> 8) as u8);

        io.write(0xA10003, TH);
        io.write(0xA10003, 0x00);
        for seq in 0..5 {
            if seq > 0 {
                io.write(0xA10003, 0x00);
            }
            for _ in 0..8 {
                checksum = checksum.wrapping_add(io.read(0xA10003) as u32);
            }
        }
    }
    let duration = start.elapsed();

    println!("Processed 1,000,000 acquisitions in {:?}", duration);
    println!("Average time per acquisition: {:?}", duration / 1_000_000);
    println!("Checksum: {:08X}", checksum);
}
