//! Field deserializers shared by the request DTOs.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};

/// Accepts `"9.99"` or `9.99`. A JSON number is parsed from its shortest
/// decimal text, so `0.1` stays `0.1` instead of the exact binary expansion.
#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalOrString {
    String(String),
    Number(serde_json::Number),
}

impl DecimalOrString {
    fn parse<E: serde::de::Error>(self) -> Result<BigDecimal, E> {
        let text = match self {
            DecimalOrString::String(s) => s,
            DecimalOrString::Number(n) => n.to_string(),
        };
        BigDecimal::from_str(text.trim())
            .map_err(|e| E::custom(format!("invalid decimal '{}': {}", text, e)))
    }
}

pub fn decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    DecimalOrString::deserialize(deserializer)?.parse()
}

pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<DecimalOrString>::deserialize(deserializer)?
        .map(DecimalOrString::parse)
        .transpose()
}

/// Absent field → `None` (needs `#[serde(default)]`), `null` → `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "decimal")]
        price: BigDecimal,
        #[serde(default, deserialize_with = "optional_decimal")]
        discount: Option<BigDecimal>,
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    fn parse(json: &str) -> Priced {
        serde_json::from_str(json).expect("should deserialize")
    }

    #[test]
    fn number_keeps_its_written_digits() {
        let p = parse(r#"{"price": 0.1}"#);
        assert_eq!(p.price, BigDecimal::from_str("0.1").unwrap());
        assert_eq!(p.price.to_string(), "0.1");
    }

    #[test]
    fn string_and_integer_forms_are_accepted() {
        assert_eq!(parse(r#"{"price": "45.50"}"#).price, BigDecimal::from_str("45.5").unwrap());
        assert_eq!(parse(r#"{"price": 20}"#).price, BigDecimal::from(20));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(serde_json::from_str::<Priced>(r#"{"price": "ten"}"#).is_err());
        assert!(serde_json::from_str::<Priced>(r#"{"price": true}"#).is_err());
    }

    #[test]
    fn optional_decimal_handles_absent_and_null() {
        assert!(parse(r#"{"price": 1}"#).discount.is_none());
        assert!(parse(r#"{"price": 1, "discount": null}"#).discount.is_none());
        assert_eq!(
            parse(r#"{"price": 1, "discount": 0.3}"#).discount,
            Some(BigDecimal::from_str("0.3").unwrap())
        );
    }

    #[test]
    fn nullable_tells_absent_from_null() {
        assert_eq!(parse(r#"{"price": 1}"#).note, None);
        assert_eq!(parse(r#"{"price": 1, "note": null}"#).note, Some(None));
        assert_eq!(
            parse(r#"{"price": 1, "note": "gift"}"#).note,
            Some(Some("gift".to_string()))
        );
    }
}
