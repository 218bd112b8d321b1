/// Amount in the smallest currency denomination (pence).
pub type MinorUnits = i64;

const MINOR_PER_MAJOR: MinorUnits = 100;
const FRACTION_DIGITS: usize = 2;

/// Normalizes raw keystrokes into an edit string.
///
/// Only ASCII digits and decimal separators survive, `,` is read as `.`, and
/// only the first separator is kept. The fraction is truncated to two digits,
/// never rounded. A trailing separator is preserved so the user can keep
/// typing, which makes `"12."` the one edit string that is not a complete
/// number.
pub fn sanitize(raw: &str) -> String {
    let mut whole = String::new();
    let mut fraction: Option<String> = None;

    for c in raw.chars() {
        match c {
            '0'..='9' => match fraction.as_mut() {
                Some(fraction) => fraction.push(c),
                None => whole.push(c),
            },
            '.' | ',' if fraction.is_none() => fraction = Some(String::new()),
            _ => {}
        }
    }

    let Some(fraction) = fraction else {
        return whole;
    };
    if whole.is_empty() {
        whole.push('0');
    }
    let fraction: String = fraction.chars().take(FRACTION_DIGITS).collect();
    format!("{whole}.{fraction}")
}

/// Converts an edit string into minor units.
///
/// Total: anything that is not `<digits>[.<digits>]` (including overflow)
/// yields zero.
pub fn to_minor_units(edit: &str) -> MinorUnits {
    let (whole, fraction) = edit.split_once('.').unwrap_or((edit, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return 0;
    }

    let whole = if whole.is_empty() {
        Some(0)
    } else {
        whole.parse::<MinorUnits>().ok()
    };
    let mut cents: String = fraction.chars().take(FRACTION_DIGITS).collect();
    while cents.len() < FRACTION_DIGITS {
        cents.push('0');
    }
    let cents = cents.parse::<MinorUnits>().unwrap_or(0);

    whole
        .and_then(|w| w.checked_mul(MINOR_PER_MAJOR))
        .and_then(|w| w.checked_add(cents))
        .unwrap_or(0)
}

/// Canonical redisplay, always `<integer>.<2 digits>`.
pub fn format(minor_units: MinorUnits) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    format!(
        "{sign}{}.{:02}",
        abs / MINOR_PER_MAJOR as u64,
        abs % MINOR_PER_MAJOR as u64
    )
}

/// Human readable sterling amount with thousands grouping, e.g. `-£1,250.00`.
pub fn display(minor_units: MinorUnits) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let abs = minor_units.unsigned_abs();
    let whole = (abs / MINOR_PER_MAJOR as u64).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}£{grouped}.{:02}", abs % MINOR_PER_MAJOR as u64)
}

/// In-progress amount typed by the user, with its derived integer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftAmount {
    edit: String,
    minor_units: MinorUnits,
}

impl Default for DraftAmount {
    fn default() -> Self {
        Self {
            edit: format(0),
            minor_units: 0,
        }
    }
}

impl DraftAmount {
    /// Applies a keystroke-level change of the whole field.
    pub fn input(&mut self, raw: &str) {
        self.edit = sanitize(raw);
        self.minor_units = to_minor_units(&self.edit);
    }

    /// Re-normalizes the field when it loses focus, so `"12."` reads `"12.00"`.
    pub fn blur(&mut self) {
        self.edit = format(self.minor_units);
    }

    pub fn edit(&self) -> &str {
        &self.edit
    }

    pub fn minor_units(&self) -> MinorUnits {
        self.minor_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_inputs() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("12"), "12");
        assert_eq!(sanitize("12.999"), "12.99");
        assert_eq!(sanitize("1.2.3"), "1.23");
        assert_eq!(sanitize("3,5"), "3.5");
        assert_eq!(sanitize("."), "0.");
        assert_eq!(sanitize(".5"), "0.5");
        assert_eq!(sanitize("12."), "12.");
        assert_eq!(sanitize("£1,234.5"), "1.23");
        assert_eq!(sanitize("abc"), "");
        assert_eq!(sanitize(" 7 . 0 1 "), "7.01");
        // non-ascii digits are not digits for money input
        assert_eq!(sanitize("٣"), "");
    }

    #[test]
    fn convert_to_minor_units() {
        assert_eq!(to_minor_units(""), 0);
        assert_eq!(to_minor_units("12"), 1200);
        assert_eq!(to_minor_units("12."), 1200);
        assert_eq!(to_minor_units("12.5"), 1250);
        assert_eq!(to_minor_units("12.05"), 1205);
        assert_eq!(to_minor_units("0.01"), 1);
        assert_eq!(to_minor_units(".7"), 70);
        assert_eq!(to_minor_units("12.999"), 1299);
        assert_eq!(to_minor_units(&sanitize("12.999")), 1299);

        // malformed input is zero, never an error
        assert_eq!(to_minor_units("abc"), 0);
        assert_eq!(to_minor_units("-5"), 0);
        assert_eq!(to_minor_units("+5"), 0);
        assert_eq!(to_minor_units("1.2.3"), 0);
        assert_eq!(to_minor_units("99999999999999999999999"), 0);
    }

    #[test]
    fn sanitized_input_is_never_negative() {
        let inputs = [
            "", "-", "-12", "--1.5", "1e9", "NaN", "Infinity", "0x1F", "12,34,56", "....", "9,",
            "99999999999999999999.99",
        ];
        for raw in inputs {
            let minor = to_minor_units(&sanitize(raw));
            assert!(minor >= 0, "{raw:?} produced {minor}");
        }
        assert_eq!(to_minor_units(&sanitize("-12")), 1200);
        assert_eq!(to_minor_units(&sanitize("1e9")), 1900);
    }

    #[test]
    fn format_minor_units() {
        assert_eq!(format(0), "0.00");
        assert_eq!(format(5), "0.05");
        assert_eq!(format(1200), "12.00");
        assert_eq!(format(123456), "1234.56");
        assert_eq!(format(-300), "-3.00");
    }

    #[test]
    fn format_is_idempotent() {
        for raw in ["", "12.", "5.5", "1.2.3", "0,01", "abc", "007.10", "12.999"] {
            let once = format(to_minor_units(&sanitize(raw)));
            let twice = format(to_minor_units(&once));
            assert_eq!(once, twice, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn display_with_symbol() {
        assert_eq!(display(0), "£0.00");
        assert_eq!(display(550), "£5.50");
        assert_eq!(display(250_000), "£2,500.00");
        assert_eq!(display(123_456_789), "£1,234,567.89");
        assert_eq!(display(-10_000), "-£100.00");
    }

    #[test]
    fn draft_amount_edit_and_blur() {
        let mut draft = DraftAmount::default();
        assert_eq!(draft.edit(), "0.00");
        assert_eq!(draft.minor_units(), 0);

        draft.input("12.");
        assert_eq!(draft.edit(), "12.");
        assert_eq!(draft.minor_units(), 1200);

        draft.blur();
        assert_eq!(draft.edit(), "12.00");
        assert_eq!(draft.minor_units(), 1200);

        draft.input("5,5");
        assert_eq!(draft.edit(), "5.5");
        assert_eq!(draft.minor_units(), 550);
    }
}
