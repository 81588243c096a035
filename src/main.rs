use std::env;
use xe1ap::io::xe_1ap::{FRAME_READS, TH};
use xe1ap::{Io, IoConfig, Xe1apFrame};

/// Data port addresses for controller ports 1 and 2
const DATA_PORTS: [u32; 2] = [0xA10003, 0xA10005];
/// Control register addresses for controller ports 1 and 2
const CTRL_PORTS: [u32; 2] = [0xA10009, 0xA1000B];

/// Run one acquisition the way a game's input routine does
fn acquire(io: &mut Io, port: usize) -> Vec<u8> {
    let data = DATA_PORTS[port];

    io.write(CTRL_PORTS[port], TH);
    io.write(data, TH);
    io.write(data, 0x00);

    let mut reads = Vec::with_capacity(FRAME_READS);
    for seq in 0..5 {
        if seq > 0 {
            io.write(data, 0x00);
        }
        for _ in 0..8 {
            reads.push(io.read(data));
        }
    }
    reads
}

fn main() {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => match IoConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => IoConfig::default(),
    };
    log::info!("Port setup: {:?}", config);

    let mut io = Io::with_config(&config);
    io.reset();

    let input = io.controller_input();
    input.set_stick(0, 0xF0, 0x20);
    input.set_throttle(0, 0xC8);
    input.set_button(0, "a", true);
    input.set_button(0, "start", true);

    for port in 0..2 {
        let reads = acquire(&mut io, port);
        let hex: Vec<String> = reads.iter().map(|d| format!("{:02X}", d)).collect();
        println!("Port {} reads: {}", port + 1, hex.join(" "));

        match Xe1apFrame::from_reads(&reads) {
            Some(frame) => println!(
                "Port {}: buttons={:04X} x={} y={} z={}",
                port + 1,
                frame.buttons,
                frame.x,
                frame.y,
                frame.z
            ),
            None => println!("Port {}: incomplete frame", port + 1),
        }
    }
}
