#[path = "../common/mod.rs"]
mod common;

use fm175xx::transport::mock::ClassicCard;
use fm175xx::{AuthMode, ClassicReadable, Error, RfidReader};

fn card() -> ClassicCard {
    ClassicCard::new(common::fixtures::classic_uid(), common::fixtures::sector_keys())
}

#[test]
fn full_read_is_1024_bytes_with_rebuilt_trailers() {
    let keys = common::fixtures::sector_keys();
    let (_chip, mut reader) = common::helpers::reader_with(card());
    let scan = reader.scan().unwrap();

    let image = reader.read_mifare_classic(&scan, &keys).unwrap();
    assert_eq!(image.len(), 1024);
    for sector in 0..16usize {
        let base = sector * 64;
        for block in 0..3 {
            let number = (sector * 4 + block) as u8;
            assert_eq!(&image[base + block * 16..base + block * 16 + 16], &[number; 16]);
        }
        assert_eq!(&image[base + 48..base + 64], &keys.trailer(sector).unwrap());
    }
}

#[test]
fn key_b_mode_uses_the_key_b_table() {
    let keys = common::fixtures::sector_keys();
    let (chip, mut reader) = common::helpers::reader_with(card());
    let scan = reader.activate().unwrap();
    chip.clear_log();

    let image = reader.read_classic_card(&scan.uid, AuthMode::KeyB, &keys).unwrap();
    assert_eq!(image.len(), 1024);
    let auth = &chip.frames()[0];
    assert_eq!(auth[0], 0x61);
    assert_eq!(&auth[2..8], keys.key_b(0).unwrap().as_bytes());
}

#[test]
fn wrong_keys_abort_before_any_data() {
    let (_chip, mut reader) = common::helpers::reader_with(card());
    let scan = reader.activate().unwrap();
    assert_eq!(
        reader.read_classic_card(&scan.uid, AuthMode::KeyA, &common::fixtures::default_keys()),
        Err(Error::Auth { sector: 0 })
    );
}

#[test]
fn exhausted_block_read_aborts_without_partial_data() {
    let (_chip, mut reader) = common::helpers::reader_with(card().fail_reads(42, 3));
    let scan = reader.scan().unwrap();
    assert!(reader
        .read_mifare_classic(&scan, &common::fixtures::sector_keys())
        .is_none());
}

#[test]
fn write_then_read_back() {
    let keys = common::fixtures::sector_keys();
    let (_chip, mut reader) = common::helpers::reader_with(card());
    let scan = reader.activate().unwrap();

    reader
        .authenticate(AuthMode::KeyA, 3, keys.key_a(3).unwrap(), &scan.uid)
        .unwrap();
    let payload: [u8; 16] = core::array::from_fn(|i| i as u8);
    reader.write_block(13, &payload).unwrap();
    assert_eq!(reader.read_block(13).unwrap(), payload);
}
