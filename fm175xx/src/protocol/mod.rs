// fm175xx/src/protocol/mod.rs

//! Card protocols run through the command executor.

pub mod iso14443a;

use crate::Error;

/// Replace a card-side failure with `stage`, keep bus failures.
pub(crate) fn stage_error(stage: Error) -> impl FnOnce(Error) -> Error {
    move |e| if e.is_bus_failure() { e } else { stage }
}
