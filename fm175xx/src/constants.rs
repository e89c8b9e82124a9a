// fm175xx/src/constants.rs
//! Protocol and card-geometry constants used across the crate

/// FIFO chunk threshold programmed into the water-level register
pub const FIFO_WATER_LEVEL: usize = 32;

/// Size of the chip's FIFO in bytes
pub const FIFO_SIZE: usize = 64;

/// Version register value of an FM17580
pub const CHIP_VERSION_FM17580: u8 = 0xA1;

/// Request: answered by idle cards only
pub const RF_CMD_REQA: u8 = 0x26;
/// Wake-up: also answered by halted cards
pub const RF_CMD_WUPA: u8 = 0x52;
/// HLTA frame, sent with CRC
pub const RF_CMD_HALT: [u8; 2] = [0x50, 0x00];
/// NVB of an anticollision frame (two whole bytes sent)
pub const RF_ANTICOLL_NVB: u8 = 0x20;
/// NVB of a select frame (seven whole bytes sent)
pub const RF_SELECT_NVB: u8 = 0x70;
/// First byte of a UID part that continues in the next cascade level
pub const RF_CASCADE_TAG: u8 = 0x88;

/// Authenticate with key A
pub const MF_CMD_AUTH_KEY_A: u8 = 0x60;
/// Authenticate with key B
pub const MF_CMD_AUTH_KEY_B: u8 = 0x61;
/// Read 16 bytes: one Classic block or four Ultralight pages
pub const MF_CMD_READ: u8 = 0x30;
/// Write one Classic block, acknowledged twice
pub const MF_CMD_WRITE: u8 = 0xA0;
/// 4-bit acknowledge returned by MIFARE cards
pub const MF_ACK: u8 = 0x0A;

/// Sectors of a Classic 1K card
pub const M1_SECTORS: usize = 16;
/// Three data blocks and one trailer
pub const M1_BLOCKS_PER_SECTOR: usize = 4;
/// Block size, also the size of every READ reply
pub const M1_BYTES_PER_BLOCK: usize = 16;
/// Bytes per Classic sector
pub const M1_BYTES_PER_SECTOR: usize = M1_BLOCKS_PER_SECTOR * M1_BYTES_PER_BLOCK;
/// Size of a full Classic 1K image
pub const M1_EEPROM_SIZE: usize = M1_SECTORS * M1_BYTES_PER_SECTOR;
/// Access bits written into reconstructed sector trailers
pub const M1_ACCESS_BITS: [u8; 4] = [0x87, 0x87, 0x87, 0x69];

/// Page count of an NTAG215
pub const NTAG215_TOTAL_PAGES: usize = 135;
/// Page count of the smaller Ultralight layout
pub const ULTRALIGHT_TOTAL_PAGES: usize = 44;
/// Ultralight/NTAG page size
pub const BYTES_PER_PAGE: usize = 4;
/// Pages returned by one READ command
pub const PAGES_PER_READ: usize = 4;
/// Upper bound of an Ultralight/NTAG image
pub const NTAG215_TOTAL_SIZE: usize = NTAG215_TOTAL_PAGES * BYTES_PER_PAGE;
/// Page counts at which a failing read marks a clean end of memory
pub const ULTRALIGHT_VALID_END_PAGES: [usize; 2] = [NTAG215_TOTAL_PAGES, ULTRALIGHT_TOTAL_PAGES];
