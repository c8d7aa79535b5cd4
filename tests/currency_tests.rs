use chrono::NaiveDate;
use finance_tracker::currency::{
    format_currency, format_currency_with, format_date, parse_amount, CurrencyCode,
    CurrencyDisplay, DateFormatStyle, FormatOptions, LocaleConfig, NegativeStyle,
};
use rust_decimal::Decimal;

#[test]
fn formats_currency_with_locale() {
    let mut locale = LocaleConfig::for_tag("fr-FR");
    locale.decimal_separator = ',';
    locale.grouping_separator = ' ';
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Symbol,
        negative_style: NegativeStyle::Parentheses,
    };
    let code = CurrencyCode::new("eur");
    let formatted = format_currency_with(Decimal::new(-12345, 1), &code, &locale, &options);
    assert_eq!(formatted, "(€1 234,50)");
}

#[test]
fn rupiah_has_no_fraction_digits() {
    let locale = LocaleConfig::default();
    let code = CurrencyCode::default();
    assert_eq!(code.as_str(), "IDR");
    assert_eq!(
        format_currency(Decimal::from(5_989_000), &code, &locale),
        "Rp 5.989.000"
    );
    assert_eq!(
        format_currency(Decimal::new(15005, 1), &code, &locale),
        "Rp 1.501"
    );
}

#[test]
fn code_display_separates_letters_from_digits() {
    let locale = LocaleConfig::for_tag("en-US");
    let options = FormatOptions {
        currency_display: CurrencyDisplay::Code,
        negative_style: NegativeStyle::Sign,
    };
    let formatted = format_currency_with(
        Decimal::new(-12345, 1),
        &CurrencyCode::new("USD"),
        &locale,
        &options,
    );
    assert_eq!(formatted, "-USD 1,234.50");
    assert_eq!(
        format_currency(Decimal::new(12346, 1), &CurrencyCode::new("JPY"), &locale),
        "¥1,235"
    );
}

#[test]
fn dates_follow_locale_style() {
    let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
    let mut locale = LocaleConfig::default();
    assert_eq!(format_date(&locale, date), "10 February 2026");
    locale.date_format = DateFormatStyle::Short;
    assert_eq!(format_date(&locale, date), "2026-02-10");
}

#[test]
fn entered_amounts_must_be_positive() {
    assert_eq!(parse_amount("65000").unwrap(), Decimal::from(65_000));
    let err = parse_amount("-1").unwrap_err();
    assert!(err.to_string().contains("greater than 0"));
}
