//! The HTTP routes served to the entry form.

/// Liveness message.
pub const ROOT: &str = "/";
/// The category and month names for the form's drop-downs.
pub const OPTIONS: &str = "/options";
/// The tracked category's total for one month.
pub const TRACKED_SUM: &str = "/lebensmittel_sum";
/// Records a new expense.
pub const ADD: &str = "/add";
