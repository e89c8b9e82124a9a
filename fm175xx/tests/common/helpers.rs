// helpers.rs — reader construction over the register-level simulator

use fm175xx::Fm175xx;
use fm175xx::test_support;
use fm175xx::transport::mock::{MockChip, SimulatedCard};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A reader in session over a simulated chip holding `card`.
pub fn reader_with(card: impl SimulatedCard + 'static) -> (MockChip, Fm175xx) {
    init_logger();
    test_support::mock_reader(card).unwrap()
}
