// Batch selection. Pure functions over the enumerated list: the rotating
// cursor is passed in and handed back instead of living in hidden state.

use crate::scan::PhotoFile;
use clap::ValueEnum;
use rand::seq::index;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "lower")]
pub enum SelectionMode {
    /// Walk the list in order, wrapping around.
    #[default]
    Sequential,
    /// Fresh uniform sample without replacement every iteration.
    Random,
}

/// Files chosen for one iteration and the cursor for the next call.
#[derive(Debug)]
pub struct Batch<'a> {
    pub files: Vec<&'a PhotoFile>,
    pub cursor: usize,
}

/// Pick the files for one iteration.
///
/// Sequential mode always returns exactly `batch_size` files starting at
/// `cursor` (modulo the list length), repeating files when the list is
/// shorter than the batch. Random mode returns
/// `min(batch_size, files.len())` distinct files and leaves the cursor
/// untouched.
pub fn select<'a, R: Rng + ?Sized>(
    files: &'a [PhotoFile],
    cursor: usize,
    batch_size: usize,
    mode: SelectionMode,
    rng: &mut R,
) -> Batch<'a> {
    if files.is_empty() {
        return Batch {
            files: Vec::new(),
            cursor,
        };
    }

    let len = files.len();
    match mode {
        SelectionMode::Sequential => {
            let start = cursor % len;
            let picked = (0..batch_size).map(|i| &files[(start + i) % len]).collect();
            Batch {
                files: picked,
                cursor: advance(start, batch_size, len),
            }
        }
        SelectionMode::Random => {
            let amount = batch_size.min(len);
            let picked = index::sample(rng, len, amount)
                .into_iter()
                .map(|i| &files[i])
                .collect();
            Batch {
                files: picked,
                cursor,
            }
        }
    }
}

/// Cursor after taking `step` files from `start` in a list of `len`.
/// `start` must already be below `len`.
fn advance(start: usize, step: usize, len: usize) -> usize {
    (start + step % len) % len
}
