//! Presentation of amounts and dates, and parsing of user-entered amounts.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::InvalidAmount;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("IDR")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("id-ID")
    }
}

impl LocaleConfig {
    /// Separators for a BCP 47 tag. Languages that group with `.` and mark
    /// decimals with `,` are listed explicitly; everything else uses the
    /// `en-US` convention.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag.split(|c| c == '-' || c == '_').next().unwrap_or_default();
        let (decimal_separator, grouping_separator) =
            match language.to_ascii_lowercase().as_str() {
                "id" | "de" | "es" | "it" | "nl" | "pt" | "tr" => (',', '.'),
                _ => ('.', ','),
            };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            date_format: DateFormatStyle::Long,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CurrencyDisplay {
    Symbol,
    Code,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            currency_display: CurrencyDisplay::Symbol,
            negative_style: NegativeStyle::Sign,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `2026-02-15`
    Short,
    /// `15 Feb 2026`
    Medium,
    /// `15 February 2026`
    Long,
}

pub fn symbol_for(code: &str) -> &str {
    match code {
        "IDR" => "Rp",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "SGD" => "S$",
        "AUD" => "A$",
        _ => code,
    }
}

/// Fraction digits shown for a currency.
pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "IDR" | "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(precision);
    let text = rounded.abs().to_string();
    let (int_part, fraction) = match text.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (text.as_str(), None),
    };
    let mut body = group_digits(int_part, locale.grouping_separator);
    if let Some(fraction) = fraction {
        body.push(locale.decimal_separator);
        body.push_str(fraction);
    }
    if rounded.is_sign_negative() && !rounded.is_zero() {
        body.insert(0, '-');
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Formats `amount` with the default options, e.g. `Rp 1.000.000`.
pub fn format_currency(amount: Decimal, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    format_currency_with(amount, code, locale, &FormatOptions::default())
}

pub fn format_currency_with(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let prefix = match options.currency_display {
        CurrencyDisplay::Symbol => symbol_for(code.as_str()),
        CurrencyDisplay::Code => code.as_str(),
    };
    // alphabetic symbols (Rp, CHF) are separated from the digits
    let spacer = if prefix.chars().last().is_some_and(char::is_alphabetic) {
        " "
    } else {
        ""
    };
    let formatted = format!("{prefix}{spacer}{body}");
    if amount.is_sign_negative() && !amount.is_zero() {
        match options.negative_style {
            NegativeStyle::Sign => format!("-{formatted}"),
            NegativeStyle::Parentheses => format!("({formatted})"),
        }
    } else {
        formatted
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{} {} {}",
            date.day(),
            &month_name(date.month())[..3],
            date.year()
        ),
        DateFormatStyle::Long => format!(
            "{} {} {}",
            date.day(),
            month_name(date.month()),
            date.year()
        ),
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "???",
    }
}

/// Parses a user-entered amount, accepting only numbers greater than zero.
pub fn parse_amount(input: &str) -> Result<Decimal, InvalidAmount> {
    let trimmed = input.trim();
    match Decimal::from_str(trimmed) {
        Ok(value) if value > Decimal::ZERO => Ok(value.normalize()),
        _ => Err(InvalidAmount(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idr() -> (CurrencyCode, LocaleConfig) {
        (CurrencyCode::new("idr"), LocaleConfig::for_tag("id-ID"))
    }

    #[test]
    fn rupiah_uses_dot_grouping() {
        let (code, locale) = idr();
        assert_eq!(
            format_currency(Decimal::from(1_000_000), &code, &locale),
            "Rp 1.000.000"
        );
        assert_eq!(format_currency(Decimal::from(999), &code, &locale), "Rp 999");
    }

    #[test]
    fn negative_amounts_carry_sign() {
        let (code, locale) = idr();
        assert_eq!(
            format_currency(Decimal::from(-150_000), &code, &locale),
            "-Rp 150.000"
        );
    }

    #[test]
    fn dollars_keep_two_decimals() {
        let locale = LocaleConfig::for_tag("en-US");
        let value = Decimal::new(123_456_7, 1);
        assert_eq!(
            format_currency(value, &CurrencyCode::new("USD"), &locale),
            "$123,456.70"
        );
    }

    #[test]
    fn long_date_spells_out_month() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        assert_eq!(format_date(&LocaleConfig::default(), date), "15 February 2026");
        let mut locale = LocaleConfig::default();
        locale.date_format = DateFormatStyle::Medium;
        assert_eq!(format_date(&locale, date), "15 Feb 2026");
    }

    #[test]
    fn parse_amount_rejects_non_positive() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(125, 1));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }
}
