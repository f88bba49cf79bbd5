use crate::data::datatable::DataValue;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Sort comparator used by the view engine.
///
/// Two numbers compare numerically (integers and floats mix freely, NaN sorts after
/// every other number). A number always sorts before a non-number. Two non-numbers
/// compare their lowercased display strings, so missing values (`Null`, rendered as "")
/// sort before text.
///
/// The result is a total order, as `slice::sort_by` requires.
pub fn compare_datavalues(a: &DataValue, b: &DataValue) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_case_insensitive(a, b),
    }
}

fn compare_case_insensitive(a: &DataValue, b: &DataValue) -> Ordering {
    let a = display_text(a);
    let b = display_text(b);
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// Text borrows; everything else renders once
fn display_text(value: &DataValue) -> Cow<'_, str> {
    match value {
        DataValue::Text(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

/// Compare with direction applied; `Equal` stays `Equal` so stable sorts keep ties in order
pub fn compare_directed(a: &DataValue, b: &DataValue, ascending: bool) -> Ordering {
    let cmp = compare_datavalues(a, b);
    if ascending {
        cmp
    } else {
        cmp.reverse()
    }
}
