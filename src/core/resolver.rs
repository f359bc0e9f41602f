use crate::core::RowFunction;
use crate::domain::model::{FunctionDescription, FunctionKind, Sign, UNKNOWN_SIGN};

/// `yyyy-` prefix length; the `MM-dd` slice starts right after it.
const MONTH_DAY_OFFSET: usize = 5;

/// Everything from the sixth character on. `None` when the input has fewer
/// than five characters; exactly five yields an empty slice.
pub fn month_day_slice(dob: &str) -> Option<&str> {
    // Counts Unicode scalar values, not UTF-16 code units; differs only for non-BMP input.
    dob.char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(dob.len()))
        .nth(MONTH_DAY_OFFSET)
        .map(|idx| &dob[idx..])
}

/// Maps a `yyyy-MM-dd` date of birth to its sign name.
///
/// Absent input gives `""`. Input that cannot be sliced or whose slice falls
/// outside every range gives [`UNKNOWN_SIGN`].
pub fn resolve(dob: Option<&str>) -> String {
    let Some(dob) = dob else {
        return String::new();
    };

    month_day_slice(dob)
        .and_then(Sign::for_month_day)
        .map(Sign::name)
        .unwrap_or(UNKNOWN_SIGN)
        .to_string()
}

/// Raw `MM-dd` slice without classification.
pub fn month_day(dob: Option<&str>) -> String {
    let Some(dob) = dob else {
        return String::new();
    };

    month_day_slice(dob).unwrap_or(UNKNOWN_SIGN).to_string()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SignResolver;

impl RowFunction for SignResolver {
    fn name(&self) -> &'static str {
        "astro_sign"
    }

    fn description(&self) -> FunctionDescription {
        FunctionDescription {
            name: self.name(),
            usage: "_FUNC_(dob) - Returns the astrological sign",
            extended: "dob is the date of birth ('yyyy-MM-dd') of the person.\n\
                       Example:\n  > SELECT _FUNC_('2001-11-11');\n  Scorpio",
        }
    }

    fn evaluate(&self, input: Option<&str>) -> String {
        resolve(input)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonthDaySlicer;

impl RowFunction for MonthDaySlicer {
    fn name(&self) -> &'static str {
        "astro_month_day"
    }

    fn description(&self) -> FunctionDescription {
        FunctionDescription {
            name: self.name(),
            usage: "_FUNC_(dob) - Returns the MM-dd part of a date of birth",
            extended: "dob is the date of birth ('yyyy-MM-dd') of the person.\n\
                       Example:\n  > SELECT _FUNC_('2001-11-11');\n  11-11",
        }
    }

    fn evaluate(&self, input: Option<&str>) -> String {
        month_day(input)
    }
}

pub fn row_function(kind: FunctionKind) -> Box<dyn RowFunction> {
    match kind {
        FunctionKind::AstroSign => Box::new(SignResolver),
        FunctionKind::AstroMonthDay => Box::new(MonthDaySlicer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SIGN_RANGES;

    #[test]
    fn test_absent_input_is_empty() {
        assert_eq!(resolve(None), "");
        assert_eq!(month_day(None), "");
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(resolve(Some("2001-11-11")), "Scorpio");
        assert_eq!(resolve(Some("2001-03-21")), "Aries");
        assert_eq!(resolve(Some("2001-03-20")), "Pisces");
        assert_eq!(resolve(Some("2001-12-31")), "Capricorn");
        assert_eq!(resolve(Some("2001-01-01")), "Capricorn");
    }

    #[test]
    fn test_every_range_endpoint() {
        for range in &SIGN_RANGES {
            let low = format!("1999-{}", range.low);
            let high = format!("1999-{}", range.high);
            assert_eq!(resolve(Some(&low)), range.sign.name(), "{}", low);
            assert_eq!(resolve(Some(&high)), range.sign.name(), "{}", high);
        }
    }

    #[test]
    fn test_faulty_input_is_unknown() {
        assert_eq!(resolve(Some("bad")), UNKNOWN_SIGN);
        assert_eq!(resolve(Some("")), UNKNOWN_SIGN);
        assert_eq!(resolve(Some("2001-")), UNKNOWN_SIGN);
        assert_eq!(resolve(Some("2001-13-01")), UNKNOWN_SIGN);
        assert_eq!(resolve(Some("2001-ab-cd")), UNKNOWN_SIGN);
        // 尾端多餘字元讓字串超過 12-31
        assert_eq!(resolve(Some("2001-12-31 00:00")), UNKNOWN_SIGN);
    }

    #[test]
    fn test_valid_date_outside_every_range_is_unknown() {
        assert_eq!(resolve(Some("2001-10-22")), UNKNOWN_SIGN);
        assert_eq!(month_day(Some("2001-10-22")), "10-22");
    }

    #[test]
    fn test_trailing_time_inside_range_still_resolves() {
        assert_eq!(resolve(Some("2001-11-11T08:30:00")), "Scorpio");
    }

    #[test]
    fn test_month_day_slice_lengths() {
        assert_eq!(month_day_slice("2001-11-11"), Some("11-11"));
        assert_eq!(month_day_slice("2001-"), Some(""));
        assert_eq!(month_day_slice("2001"), None);
        assert_eq!(month_day_slice("年年年年-05-01"), Some("05-01"));
    }

    #[test]
    fn test_month_day_diagnostic() {
        assert_eq!(month_day(Some("2001-11-11")), "11-11");
        assert_eq!(month_day(Some("bad")), UNKNOWN_SIGN);
    }

    #[test]
    fn test_row_function_dispatch() {
        let sign = row_function(FunctionKind::AstroSign);
        let slicer = row_function(FunctionKind::AstroMonthDay);

        assert_eq!(sign.name(), "astro_sign");
        assert_eq!(sign.evaluate(Some("1988-08-01")), "Leo");
        assert_eq!(slicer.name(), "astro_month_day");
        assert_eq!(slicer.evaluate(Some("1988-08-01")), "08-01");
    }

    #[test]
    fn test_sign_resolver_description() {
        let description = SignResolver.description();
        assert_eq!(
            description.usage(),
            "astro_sign(dob) - Returns the astrological sign"
        );
        assert!(description
            .render_extended()
            .contains("> SELECT astro_sign('2001-11-11');"));
    }
}
