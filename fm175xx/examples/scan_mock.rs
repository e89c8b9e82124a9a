//! Scan loop against the simulated chip.
//!
//! Usage:
//!   RUST_LOG=debug cargo run -p fm175xx --example scan_mock

use anyhow::Context;
use fm175xx::device::{ReaderBuilder, ReaderConfig};
use fm175xx::transport::mock::{ClassicCard, MockChip, MockPin, UltralightCard};
use fm175xx::{MifareKey, RfidReader, TagAuthentication, TagType};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let keys = TagAuthentication::uniform(MifareKey::DEFAULT, MifareKey::DEFAULT);
    let chip = MockChip::new();
    let mut reader = ReaderBuilder::new()
        .with_bus(Box::new(chip.clone()))
        .with_reset_pin(Box::new(MockPin::new()))
        .with_config(ReaderConfig::default().with_name("demo").with_reset_pulse_ms(0))
        .build()
        .context("reader bring-up failed")?;
    println!("Chip: {:?}", reader.chip_type()?);

    chip.insert_card(ClassicCard::new([0x5A, 0x3C, 0x91, 0x0E], keys.clone()));
    scan_once(&mut reader, &keys)?;

    chip.insert_card(UltralightCard::ntag215([
        0x04, 0x8A, 0x31, 0x62, 0xB2, 0x5D, 0x80,
    ]));
    scan_once(&mut reader, &keys)?;

    chip.remove_card();
    scan_once(&mut reader, &keys)?;
    Ok(())
}

fn scan_once(reader: &mut dyn RfidReader, keys: &TagAuthentication) -> anyhow::Result<()> {
    reader.start_session()?;
    let Some(scan) = reader.scan() else {
        println!("No tag in field");
        return Ok(reader.end_session()?);
    };
    println!("{}", scan);

    let data = match scan.tag_type {
        TagType::MifareClassic1k => reader
            .as_classic()
            .and_then(|r| r.read_mifare_classic(&scan, keys)),
        TagType::MifareUltralight => reader
            .as_ultralight()
            .and_then(|r| r.read_mifare_ultralight(&scan)),
        TagType::Unknown => None,
    };
    match data {
        Some(data) => println!(
            "Read {} bytes, first block: {}",
            data.len(),
            hex::encode(&data[..16])
        ),
        None => println!("Tag could not be read"),
    }
    reader.end_session()?;
    Ok(())
}
