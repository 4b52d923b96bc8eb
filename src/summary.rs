/// Overall status and message for a run of `total` items.
///
/// Rules are checked in order: full success, full failure, nothing to do,
/// then mixed.
pub fn summarize(error_count: usize, unchanged_count: usize, total: usize) -> (u16, String) {
    if error_count == 0 && unchanged_count == 0 {
        (
            200,
            format!("All {total} items were successfully inserted/updated"),
        )
    } else if error_count == total {
        (500, format!("All {total} items failed to insert/update."))
    } else if unchanged_count == total {
        (
            304,
            format!("All {total} items were unchanged and didn't need an update."),
        )
    } else {
        (
            207,
            format!(
                "Out of {total} items, {error_count} failed to insert/update and {unchanged_count} did not need an update."
            ),
        )
    }
}
