/// Formats a computed value for display: at most ten fractional digits,
/// trailing zeros and a dangling decimal point removed.
///
/// The output re-parses to within 1e-9 of the input, which the test suite
/// relies on.
pub fn format_value(value: f64) -> String {
    let formatted = format!("{value:.10}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        return "0".to_string();
    }
    trimmed.to_string()
}
