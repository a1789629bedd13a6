//! Serde support for [`GiftId`].
//!
//! Identifiers near `2^63` exceed the 53-bit mantissa of IEEE-754 doubles,
//! so the external representation is a decimal string, never a JSON
//! number. Deserialisation re-validates the reserved bit.

use crate::GiftId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

impl Serialize for GiftId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GiftId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = GiftId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal string gift identifier")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{GiftClass, GiftId};
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        gift_id: GiftId,
        gift_class: GiftClass,
    }

    #[test]
    fn round_trips_as_decimal_string() {
        let row = Row {
            gift_id: GiftId::from_components(1, 1, 0, GiftClass::Toy).unwrap(),
            gift_class: GiftClass::Coal,
        };

        let json = serde_json::to_value(&row).expect("serialize");
        assert_eq!(json, json!({"gift_id": "4198400", "gift_class": "coal"}));

        let back: Row = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, row);
    }

    #[test]
    fn rejects_reserved_bit_on_deserialize() {
        let json = json!({"gift_id": u64::MAX.to_string(), "gift_class": "toy"});
        assert!(serde_json::from_value::<Row>(json).is_err());
    }

    #[test]
    fn rejects_non_decimal_strings() {
        let json = json!({"gift_id": "santa", "gift_class": "toy"});
        assert!(serde_json::from_value::<Row>(json).is_err());
    }

    #[test]
    fn rejects_bare_numbers() {
        let json = json!({"gift_id": 4_198_400, "gift_class": "toy"});
        assert!(serde_json::from_value::<Row>(json).is_err());
    }
}
