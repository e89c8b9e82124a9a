#[path = "../common/mod.rs"]
mod common;

use fm175xx::device::{Register, TimerSetting};
use fm175xx::transport::MockChip;

#[test]
fn register_frames_on_the_bus() {
    let chip = MockChip::new();
    let mut reader = fm175xx::test_support::reader_over(chip.clone()).unwrap();
    chip.clear_log();

    let regs = reader.registers();
    regs.write(Register::WaterLevel, 0x20).unwrap();
    assert_eq!(regs.read(Register::WaterLevel).unwrap(), 0x20);
    assert_eq!(
        chip.transfers(),
        vec![vec![0x16, 0x20], vec![0x96, 0x00]]
    );
}

#[test]
fn fifo_roundtrip_through_registers() {
    let chip = MockChip::new();
    let mut reader = fm175xx::test_support::reader_over(chip.clone()).unwrap();
    let regs = reader.registers();

    regs.fifo_write(&[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(regs.read(Register::FifoLevel).unwrap(), 5);
    assert_eq!(regs.fifo_read(5).unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(regs.read(Register::FifoLevel).unwrap(), 0);
}

#[test]
fn representative_timeouts_fit_the_timer_registers() {
    for micros in [10u32, 200, 5_000] {
        let setting = TimerSetting::from_micros(micros);
        let requested = u64::from(micros) * 13_560;
        let tick = 2 * u64::from(setting.prescaler) + 1;
        assert!(setting.prescaler <= 0x0FFF);
        assert!(setting.clock_periods() >= requested, "{} us", micros);
        assert!(setting.clock_periods() - requested < tick, "{} us", micros);
    }

    // Beyond the timer range the prescaler saturates; registers stay in range
    let setting = TimerSetting::from_micros(65_535);
    assert_eq!(setting.prescaler, 0x0FFF);
    assert_eq!(setting.mode(), 0x8F);
}

#[test]
fn set_timeout_programs_msb_then_lsb() {
    let chip = MockChip::new();
    let mut reader = fm175xx::test_support::reader_over(chip.clone()).unwrap();
    chip.clear_log();

    reader.registers().set_timeout(200).unwrap();
    let setting = TimerSetting::from_micros(200);
    let expected: Vec<Vec<u8>> = vec![
        vec![0x54, setting.mode()],
        vec![0x56, (setting.prescaler & 0xFF) as u8],
        vec![0x58, (setting.reload >> 8) as u8],
        vec![0x5A, (setting.reload & 0xFF) as u8],
    ];
    assert_eq!(chip.transfers(), expected);
}
