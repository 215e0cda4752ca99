//! Dynamically typed setting values and the typed bridge onto them.

use core::fmt;

use crate::time::{ArpPattern, Resolution};

/// Stored form of every setting.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i32),
    Resolution(Resolution),
    Pattern(ArpPattern),
    Text(String),
}

impl SettingValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Resolution(_) => "resolution",
            SettingValue::Pattern(_) => "pattern",
            SettingValue::Text(_) => "text",
        }
    }

    pub fn same_type(&self, other: &SettingValue) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", if *v { "On" } else { "Off" }),
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::Resolution(v) => write!(f, "{v}"),
            SettingValue::Pattern(v) => write!(f, "{v}"),
            SettingValue::Text(v) => f.write_str(v),
        }
    }
}

/// Rust types that can be stored on the bus.
pub trait SettingType: Clone + Send + Sync + 'static {
    const TYPE_NAME: &'static str;

    fn into_value(self) -> SettingValue;

    fn from_value(value: &SettingValue) -> Option<Self>;
}

macro_rules! impl_setting_type {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl SettingType for $ty {
            const TYPE_NAME: &'static str = $name;

            #[inline]
            fn into_value(self) -> SettingValue {
                SettingValue::$variant(self)
            }

            #[inline]
            fn from_value(value: &SettingValue) -> Option<Self> {
                match value {
                    SettingValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

impl_setting_type!(bool, Bool, "bool");
impl_setting_type!(i32, Int, "int");
impl_setting_type!(Resolution, Resolution, "resolution");
impl_setting_type!(ArpPattern, Pattern, "pattern");
impl_setting_type!(String, Text, "text");
