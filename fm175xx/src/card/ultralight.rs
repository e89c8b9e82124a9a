// fm175xx/src/card/ultralight.rs

//! MIFARE Ultralight / NTAG page access.

use log::debug;

use crate::constants::{
    BYTES_PER_PAGE, M1_BYTES_PER_BLOCK, NTAG215_TOTAL_PAGES, NTAG215_TOTAL_SIZE, PAGES_PER_READ,
    ULTRALIGHT_VALID_END_PAGES,
};
use crate::device::Fm175xx;
use crate::{Error, Result};

impl Fm175xx {
    /// Read the 4-page window starting at `page`.
    pub fn read_page(&mut self, page: u8) -> Result<[u8; M1_BYTES_PER_BLOCK]> {
        self.read_window(page)
    }

    /// Read the whole user memory, up to NTAG215 size.
    ///
    /// A window that cannot be read at or right after a known end of
    /// memory (44 or 135 pages) ends the dump; anywhere else it is a read
    /// error.
    pub fn read_ultralight_card(&mut self) -> Result<Vec<u8>> {
        self.warn_outside_session("read_mifare_ultralight");
        let mut image = Vec::with_capacity(NTAG215_TOTAL_SIZE);
        for page in (0..NTAG215_TOTAL_PAGES).step_by(PAGES_PER_READ) {
            match self.with_retries("read page", |r| r.read_page(page as u8)) {
                Ok(window) => {
                    let take = (NTAG215_TOTAL_SIZE - page * BYTES_PER_PAGE).min(window.len());
                    image.extend_from_slice(&window[..take]);
                }
                Err(e @ Error::Read(_)) => {
                    let Some(end) = memory_end_before(page) else {
                        return Err(e);
                    };
                    debug!("end of memory after {} pages", end);
                    image.truncate(end * BYTES_PER_PAGE);
                    return Ok(image);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(image)
    }
}

/// Pages to keep when the window starting at `page` fails.
///
/// A known capacity `E` inside the failing window (`page - 4 < E <= page`)
/// keeps `E` pages. A failing window whose previous boundary is `E` keeps
/// `page` pages, since the window at `E` was answered by a tag slightly
/// larger than `E` (NTAG213 has 45).
fn memory_end_before(page: usize) -> Option<usize> {
    let previous = page.checked_sub(PAGES_PER_READ)?;
    ULTRALIGHT_VALID_END_PAGES.iter().find_map(|&end| {
        if end == previous {
            Some(page)
        } else if previous < end && end <= page {
            Some(end)
        } else {
            None
        }
    })
}
