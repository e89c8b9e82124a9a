#[path = "../common/mod.rs"]
mod common;

use std::time::{Duration, Instant};

use fm175xx::Error;
use fm175xx::device::CommandDescriptor;
use fm175xx::device::register::bits;
use fm175xx::transport::MockChip;
use fm175xx::transport::mock::{CardReply, ScriptedCard};

#[test]
fn silent_chip_returns_timer_error_within_deadline() {
    common::helpers::init_logger();
    let chip = MockChip::new();
    let mut reader = fm175xx::test_support::reader_over(chip.clone()).unwrap();
    chip.set_unresponsive(true);

    let mut cmd = CommandDescriptor::transceive(&[0x52], 2)
        .with_last_bits(7)
        .with_timeout(10);
    let started = Instant::now();
    assert_eq!(reader.execute(&mut cmd), Err(Error::Timer));
    // 50 ms margin plus the command timeout, with room for a slow runner
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn long_reply_is_drained_in_water_level_chunks() {
    let reply: Vec<u8> = (0u8..48).map(|b| b.wrapping_mul(7)).collect();
    let (_chip, mut reader) =
        common::helpers::reader_with(ScriptedCard::new(vec![CardReply::Bytes(reply.clone())]));

    let mut cmd = CommandDescriptor::transceive(&[0x3A, 0x00, 0x0B], 0);
    assert_eq!(reader.execute(&mut cmd).unwrap(), reply);
    assert_eq!(cmd.bytes_received, 48);
}

#[test]
fn nibble_reply_reports_received_bits() {
    let (_chip, mut reader) =
        common::helpers::reader_with(ScriptedCard::new(vec![CardReply::Nibble(0x0A)]));

    let mut cmd = CommandDescriptor::transceive(&[0xA0, 0x04], 1).with_crc(true, false);
    assert_eq!(reader.execute(&mut cmd).unwrap(), vec![0x0A]);
    assert_eq!(cmd.bits_received, 4);
}

#[test]
fn collision_is_reported_with_position() {
    let (_chip, mut reader) = common::helpers::reader_with(ScriptedCard::new(vec![
        CardReply::Collision { position: 12 },
    ]));

    let mut cmd = CommandDescriptor::transceive(&[0x93, 0x20], 5);
    assert_eq!(
        reader.execute(&mut cmd),
        Err(Error::Collision { position: 12 })
    );
    assert_eq!(cmd.collision_position, 12);
}

#[test]
fn executor_recovers_after_a_failed_exchange() {
    let (_chip, mut reader) = common::helpers::reader_with(ScriptedCard::new(vec![
        CardReply::ProtocolError(0x01),
        CardReply::Bytes(vec![0x44, 0x00]),
    ]));

    let mut first = CommandDescriptor::transceive(&[0x52], 2).with_last_bits(7);
    assert_eq!(
        reader.execute(&mut first),
        Err(Error::Comm { error_flags: 0x01 })
    );
    let mut second = CommandDescriptor::transceive(&[0x52], 2).with_last_bits(7);
    assert_eq!(reader.execute(&mut second).unwrap(), vec![0x44, 0x00]);
}

#[test]
fn timer_flag_wins_over_a_completed_receive() {
    let (chip, mut reader) =
        common::helpers::reader_with(ScriptedCard::new(vec![CardReply::Bytes(vec![0x04, 0x00])]));
    chip.raise_with_next_reply(bits::IRQ_TIMER);

    let mut cmd = CommandDescriptor::transceive(&[0x52], 2).with_last_bits(7);
    assert_eq!(reader.execute(&mut cmd), Err(Error::Timer));
    assert_eq!(cmd.bytes_received, 0);
}

#[test]
fn protocol_error_wins_over_a_completed_receive() {
    let (chip, mut reader) =
        common::helpers::reader_with(ScriptedCard::new(vec![CardReply::ProtocolError(0x04)]));
    chip.raise_with_next_reply(bits::IRQ_RX);

    let mut cmd = CommandDescriptor::transceive(&[0x30, 0x04], 16).with_crc(true, true);
    assert_eq!(
        reader.execute(&mut cmd),
        Err(Error::Comm { error_flags: 0x04 })
    );
    assert_eq!(cmd.error_flags, 0x04);
}

#[test]
fn collision_wins_over_a_completed_receive() {
    let (chip, mut reader) = common::helpers::reader_with(ScriptedCard::new(vec![
        CardReply::Collision { position: 9 },
    ]));
    chip.raise_with_next_reply(bits::IRQ_RX);

    let mut cmd = CommandDescriptor::transceive(&[0x93, 0x20], 5);
    assert_eq!(
        reader.execute(&mut cmd),
        Err(Error::Collision { position: 9 })
    );
}

#[test]
fn timer_flag_wins_over_a_protocol_error() {
    let (chip, mut reader) =
        common::helpers::reader_with(ScriptedCard::new(vec![CardReply::ProtocolError(0x01)]));
    chip.raise_with_next_reply(bits::IRQ_TIMER);

    let mut cmd = CommandDescriptor::transceive(&[0x52], 2).with_last_bits(7);
    assert_eq!(reader.execute(&mut cmd), Err(Error::Timer));
}
