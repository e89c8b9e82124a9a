#[path = "../common/mod.rs"]
mod common;

use fm175xx::transport::mock::{
    CardReply, ClassicCard, Iso14443Identity, ScriptedCard, UltralightCard,
};
use fm175xx::{CascadeLevel, Error, RfidReader, TagType};

#[test]
fn atqa_uid_size_bits_select_the_cascade_depth() {
    let table = [
        ([0x04, 0x00], Some(CascadeLevel::One)),
        ([0x44, 0x00], Some(CascadeLevel::Two)),
        ([0x84, 0x00], Some(CascadeLevel::Three)),
        ([0xC4, 0x00], None),
    ];
    for (atqa, expected) in table {
        assert_eq!(CascadeLevel::from_atqa(atqa), expected, "ATQA {:02X?}", atqa);
    }
}

#[test]
fn four_byte_uid_needs_one_level() {
    let uid = common::fixtures::classic_uid();
    let (chip, mut reader) =
        common::helpers::reader_with(ClassicCard::new(uid, common::fixtures::default_keys()));

    let scan = reader.activate().unwrap();
    assert_eq!(scan.uid.as_bytes(), &uid);
    assert_eq!(scan.tag_type, TagType::MifareClassic1k);
    // WUPA, anticollision, select
    assert_eq!(chip.frames().len(), 3);
}

#[test]
fn seven_byte_uid_drops_the_cascade_tag() {
    let uid = common::fixtures::ntag_uid();
    let (chip, mut reader) = common::helpers::reader_with(UltralightCard::ntag215(uid));

    let scan = reader.activate().unwrap();
    assert_eq!(scan.uid.as_bytes(), &uid);
    assert_eq!(scan.sak, vec![0x04, 0x00]);
    assert_eq!(scan.bcc, vec![0x88 ^ uid[0] ^ uid[1] ^ uid[2], uid[3] ^ uid[4] ^ uid[5] ^ uid[6]]);
    assert_eq!(scan.tag_type, TagType::MifareUltralight);

    let frames = chip.frames();
    assert_eq!(frames[1], vec![0x93, 0x20]);
    assert_eq!(frames[3], vec![0x95, 0x20]);
}

#[test]
fn ten_byte_uid_walks_three_levels() {
    let uid = common::fixtures::triple_uid();
    let card = ClassicCard::new([0; 4], common::fixtures::default_keys())
        .with_identity(Iso14443Identity::new(&uid, 0x20));
    let (chip, mut reader) = common::helpers::reader_with(card);

    let scan = reader.activate().unwrap();
    assert_eq!(scan.uid.as_bytes(), uid.as_slice());
    assert_eq!(scan.atqa[0] & 0xC0, 0x80);
    assert_eq!(scan.sak, vec![0x04, 0x04, 0x20]);
    assert_eq!(scan.tag_type, TagType::Unknown);
    assert_eq!(chip.frames()[5], vec![0x97, 0x20]);
}

#[test]
fn bad_bcc_is_a_collision_even_without_chip_error() {
    let uid = common::fixtures::classic_uid();
    let card = ClassicCard::new(uid, common::fixtures::default_keys())
        .with_identity(Iso14443Identity::new(&uid, 0x08).with_corrupt_bcc());
    let (_chip, mut reader) = common::helpers::reader_with(card);

    assert_eq!(reader.activate(), Err(Error::Collision { position: 0 }));
    assert!(reader.scan().is_none());
}

#[test]
fn missing_card_fails_wakeup() {
    let (_chip, mut reader) = common::helpers::reader_with(ScriptedCard::default());
    assert_eq!(reader.activate(), Err(Error::Wakeup));
}

#[test]
fn halt_inversion() {
    // Silent card: the timeout is the success case
    let (_chip, mut reader) = common::helpers::reader_with(ScriptedCard::default());
    assert_eq!(reader.halt(), Ok(()));

    // A card that still answers did not halt
    let (_chip, mut reader) = common::helpers::reader_with(ScriptedCard::new(vec![
        CardReply::Bytes(vec![0x00]),
    ]));
    assert_eq!(reader.halt(), Err(Error::Halt));
}

#[test]
fn scan_result_renders_identity() {
    let (_chip, mut reader) = common::helpers::reader_with(ClassicCard::new(
        [0x5A, 0x3C, 0x91, 0x0E],
        common::fixtures::default_keys(),
    ));
    let scan = reader.scan().unwrap();
    let text = scan.to_string();
    assert!(text.starts_with("Tag detected:\n- TagType: Mifare Classic 1K"));
    assert!(text.contains("- UID: 5A:3C:91:0E"));
    assert!(text.contains("- SAK: 08"));
    assert_eq!(scan.uid.to_hex(), "5a3c910e");
}
