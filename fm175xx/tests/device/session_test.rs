#[path = "../common/mod.rs"]
mod common;

use fm175xx::device::{ReaderBuilder, ReaderConfig, Register};
use fm175xx::transport::mock::{ClassicCard, MockPin, UltralightCard};
use fm175xx::transport::MockChip;
use fm175xx::{CarrierWave, ChipType, Error, RfidReader, TagType};

#[test]
fn builder_brings_up_a_verified_chip() {
    common::helpers::init_logger();
    let chip = MockChip::new();
    let pin = MockPin::new();
    let mut reader = ReaderBuilder::new()
        .with_bus(Box::new(chip.clone()))
        .with_reset_pin(Box::new(pin.clone()))
        .with_config(
            ReaderConfig::default()
                .with_reset_pulse_ms(0)
                .with_verify_chip(true),
        )
        .build()
        .unwrap();

    assert_eq!(pin.levels(), vec![false, true]);
    assert_eq!(reader.chip_type().unwrap(), ChipType::Fm17580);
    assert_eq!(reader.carrier_wave(), CarrierWave::Off);
}

#[test]
fn builder_rejects_unknown_chip_when_verifying() {
    let chip = MockChip::new();
    chip.set_version(0x12);
    let result = ReaderBuilder::new()
        .with_bus(Box::new(chip))
        .with_config(
            ReaderConfig::default()
                .with_reset_pulse_ms(0)
                .with_verify_chip(true),
        )
        .build();
    assert!(matches!(result, Err(Error::ChipType(0x12))));
}

#[test]
fn session_switches_the_field() {
    let chip = MockChip::new();
    let mut reader = fm175xx::test_support::reader_over(chip.clone()).unwrap();
    assert_eq!(reader.carrier_wave(), CarrierWave::Both);
    assert_eq!(chip.register(Register::TxControl) & 0x03, 0x03);

    RfidReader::end_session(&mut reader).unwrap();
    assert_eq!(chip.register(Register::TxControl) & 0x03, 0x00);
    assert_eq!(reader.carrier_wave(), CarrierWave::Off);
}

#[test]
fn end_session_halts_the_card() {
    let (chip, mut reader) = common::helpers::reader_with(ClassicCard::new(
        common::fixtures::classic_uid(),
        common::fixtures::default_keys(),
    ));
    reader.scan().unwrap();
    reader.end_session().unwrap();
    assert_eq!(chip.frames().last().unwrap(), &vec![0x50, 0x00]);

    // WUPA wakes the halted card again
    reader.start_session().unwrap();
    assert!(reader.scan().is_some());
}

#[test]
fn scan_loop_queries_capabilities() {
    let (_chip, mut reader) =
        common::helpers::reader_with(UltralightCard::ntag215(common::fixtures::ntag_uid()));
    let reader: &mut dyn RfidReader = &mut reader;

    let scan = reader.scan().unwrap();
    assert_eq!(scan.tag_type, TagType::MifareUltralight);
    let data = reader
        .as_ultralight()
        .unwrap()
        .read_mifare_ultralight(&scan)
        .unwrap();
    assert_eq!(data.len(), 540);
    reader.end_session().unwrap();
}
