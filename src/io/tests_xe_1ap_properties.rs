//! XE-1AP Property-Based Tests
//!
//! Uses proptest to check the protocol invariants against arbitrary
//! sequences of host reads and writes.

use super::xe_1ap::{Xe1ap, Xe1apFrame, TH, TL, TR};
use crate::input::{buttons, InputSnapshot};
use proptest::prelude::*;

/// A host access to the controller
#[derive(Debug, Clone, Copy)]
enum Access {
    Read,
    Write(u8, u8),
}

fn access() -> impl Strategy<Value = Access> {
    prop_oneof![
        3 => Just(Access::Read),
        1 => (any::<u8>(), any::<u8>()).prop_map(|(d, m)| Access::Write(d, m)),
    ]
}

fn run(pad: &mut Xe1ap, input: &InputSnapshot, ops: &[Access]) {
    for op in ops {
        match *op {
            Access::Read => {
                pad.read(input);
            }
            Access::Write(data, mask) => pad.write(data, mask),
        }
    }
}

proptest! {
    /// The sequence start never passes the fifth sequence
    #[test]
    fn sequence_never_exceeds_last(ops in prop::collection::vec(access(), 0..300)) {
        let mut input = InputSnapshot::new();
        let mut pad = Xe1ap::new(0);
        pad.reset(&mut input);

        for op in ops {
            run(&mut pad, &input, &[op]);
            prop_assert!(pad.cycle() & !7 <= 32);
            prop_assert!(pad.cycle() < 40);
        }
    }

    /// A TH falling edge always restarts the frame
    #[test]
    fn falling_edge_always_resets(
        ops in prop::collection::vec(access(), 0..100),
        other_bits in any::<u8>(),
    ) {
        let mut input = InputSnapshot::new();
        let mut pad = Xe1ap::new(1);
        pad.reset(&mut input);
        run(&mut pad, &input, &ops);

        // Force TH high, then drop it
        pad.write(TH, TH);
        pad.write(other_bits & !TH, 0xFF);

        prop_assert_eq!(pad.cycle(), 0);
        prop_assert_eq!(pad.latency(), 0);
        prop_assert_eq!(pad.state(), other_bits & !TH);
    }

    /// Every read carries the idle marker, never bit 7, and the status
    /// bits follow the internal cycle
    #[test]
    fn read_status_bits(
        ops in prop::collection::vec(access(), 0..200),
        x in any::<u8>(), y in any::<u8>(), z in any::<u8>(), pad_bits in any::<u16>(),
    ) {
        let mut input = InputSnapshot::new();
        let mut pad = Xe1ap::new(0);
        pad.reset(&mut input);
        input.set_stick(0, x, y);
        input.set_throttle(0, z);
        input.pad[0] = pad_bits;

        run(&mut pad, &input, &ops);

        let cycle = pad.cycle() & 7;
        let data = pad.read(&input);
        prop_assert_eq!(data & TH, TH);
        prop_assert_eq!(data & 0x80, 0);
        prop_assert_eq!(data & TL != 0, cycle >= 4);
        prop_assert_eq!(data & TR != 0, cycle == 0 || cycle == 4);
        prop_assert_eq!(pad.cycle() & 7, (cycle + 1) & 7);
    }

    /// Writes only ever touch the masked bits of the shadow register
    #[test]
    fn write_respects_mask(before in any::<u8>(), data in any::<u8>(), mask in any::<u8>()) {
        let mut pad = Xe1ap::new(0);
        pad.write(before, 0xFF);
        pad.write(data, mask);
        prop_assert_eq!(pad.state(), (before & !mask) | (data & mask));
    }

    /// Early writes never move the sequence; late ones always do
    #[test]
    fn latency_guard(reads in 0usize..12) {
        let mut input = InputSnapshot::new();
        let mut pad = Xe1ap::new(0);
        pad.reset(&mut input);
        pad.write(0x00, TH);

        for _ in 0..reads {
            pad.read(&input);
        }
        let before = pad.cycle();
        pad.write(0x00, TH);

        if reads > 3 {
            prop_assert_eq!(pad.cycle(), (before & !7) + 8);
        } else {
            prop_assert_eq!(pad.cycle(), before);
        }
    }

    /// A full host acquisition decodes back to the sampled input
    #[test]
    fn acquisition_matches_input(
        x in any::<u8>(), y in any::<u8>(), z in any::<u8>(), pad_bits in any::<u16>(),
    ) {
        let mut input = InputSnapshot::new();
        let mut pad = Xe1ap::new(1);
        pad.reset(&mut input);
        input.set_stick(1, x, y);
        input.set_throttle(1, z);
        input.pad[4] = pad_bits;

        pad.write(0x00, TH);
        let mut reads = Vec::new();
        for seq in 0..5 {
            if seq > 0 {
                pad.write(0x00, TH);
            }
            for _ in 0..8 {
                reads.push(pad.read(&input));
            }
        }

        let frame = Xe1apFrame::from_reads(&reads).unwrap();
        prop_assert_eq!(frame.x, x);
        prop_assert_eq!(frame.y, y);
        prop_assert_eq!(frame.z, z);
        prop_assert_eq!(frame.buttons, pad_bits & buttons::ALL);
    }
}
