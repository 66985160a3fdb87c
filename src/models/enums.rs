use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The serde representation is the same string as `as_str`. Leading
/// attributes (extra derives, docs) are forwarded to the enum.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Sex {
    Male => "M",
    Female => "F",
});

str_enum!(MeasurementKind {
    Weight => "weight",
    Length => "length",
    HeadCircumference => "head_circumference",
});

str_enum!(ActionType {
    Prescription => "prescription",
    Exam => "exam",
    Advice => "advice",
    Diagnosis => "diagnosis",
    Referral => "referral",
});

str_enum!(LearningEventType {
    Observation => "observation",
    Accepted => "accepted",
    Rejected => "rejected",
    Deactivated => "deactivated",
});

str_enum!(Trimester {
    First => "T1",
    Second => "T2",
    Third => "T3",
});

str_enum!(
    /// Urine dipstick result, ordered from negative to three crosses.
    #[derive(PartialOrd, Ord)]
    Proteinuria {
        Negative => "negative",
        Traces => "traces",
        Plus => "+",
        PlusPlus => "++",
        PlusPlusPlus => "+++",
    }
);

impl MeasurementKind {
    /// Unit of the reference tables for this measurement.
    pub fn reference_unit(&self) -> &'static str {
        match self {
            Self::Weight => "kg",
            Self::Length | Self::HeadCircumference => "cm",
        }
    }

    /// Convert a raw clinical input into the reference unit:
    /// grams to kilograms, centimeters unchanged, millimeters to centimeters.
    pub fn to_reference_unit(&self, raw: f64) -> f64 {
        match self {
            Self::Weight => raw / 1000.0,
            Self::Length => raw,
            Self::HeadCircumference => raw / 10.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Weight => "Weight",
            Self::Length => "Length",
            Self::HeadCircumference => "Head circumference",
        }
    }
}
