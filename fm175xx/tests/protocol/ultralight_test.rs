#[path = "../common/mod.rs"]
mod common;

use fm175xx::transport::mock::UltralightCard;
use fm175xx::{Error, RfidReader, UltralightReadable};

#[test]
fn ntag215_dump_is_540_bytes() {
    let card = UltralightCard::ntag215(common::fixtures::ntag_uid())
        .with_page(4, [0x03, 0x0C, 0xD1, 0x01]);
    let (chip, mut reader) = common::helpers::reader_with(card);
    let scan = reader.scan().unwrap();
    chip.clear_log();

    let data = reader.read_mifare_ultralight(&scan).unwrap();
    assert_eq!(data.len(), 540);
    assert_eq!(&data[16..20], &[0x03, 0x0C, 0xD1, 0x01]);
    // 34 windows: pages 0, 4, ..., 132
    assert_eq!(chip.frames().len(), 34);
    assert_eq!(chip.frames().last().unwrap(), &vec![0x30, 132]);
}

#[test]
fn forty_four_page_tag_truncates_cleanly() {
    let (_chip, mut reader) =
        common::helpers::reader_with(UltralightCard::new(common::fixtures::ntag_uid(), 44));
    reader.scan().unwrap();
    let data = reader.read_ultralight_card().unwrap();
    assert_eq!(data.len(), 44 * 4);
}

#[test]
fn forty_five_page_tag_keeps_the_rolled_over_window() {
    let (chip, mut reader) =
        common::helpers::reader_with(UltralightCard::new(common::fixtures::ntag_uid(), 45));
    let scan = reader.scan().unwrap();
    chip.clear_log();

    let data = reader.read_mifare_ultralight(&scan).unwrap();
    assert_eq!(data.len(), 48 * 4);
    assert_eq!(&data[176..180], &[44; 4]);
    assert_eq!(chip.frames().last().unwrap(), &vec![0x30, 48]);
}

#[test]
fn forty_eight_page_tag_stops_after_page_47() {
    let (_chip, mut reader) =
        common::helpers::reader_with(UltralightCard::new(common::fixtures::ntag_uid(), 48));
    reader.scan().unwrap();
    let data = reader.read_ultralight_card().unwrap();
    assert_eq!(data.len(), 48 * 4);
    assert_eq!(&data[188..192], &[47; 4]);
}

#[test]
fn unexpected_end_of_memory_is_a_read_error() {
    let (_chip, mut reader) =
        common::helpers::reader_with(UltralightCard::new(common::fixtures::ntag_uid(), 20));
    let scan = reader.scan().unwrap();
    assert_eq!(reader.read_ultralight_card(), Err(Error::Read(20)));
    assert!(reader.read_mifare_ultralight(&scan).is_none());
}
