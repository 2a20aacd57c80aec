use std::fmt;

use crate::util::trim;

/// A scalar stored as text.
///
/// The text is never checked when written. It is only interpreted when read back, as whatever
/// type the caller asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    text: String,
}

impl Value {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the canonical text form of `value`, replacing whatever was there.
    pub fn set<T: ToValue>(&mut self, value: T) {
        self.text = value.to_value();
    }

    /// Read the text as `T`, falling back to `T::default()` when it does not parse.
    #[must_use]
    pub fn get<T: FromValue>(&self) -> T {
        self.try_get().unwrap_or_default()
    }

    #[must_use]
    pub fn try_get<T: FromValue>(&self) -> Option<T> {
        T::from_value(&self.text)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.text, f)
    }
}

/// Types that can be written into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> String;
}

/// Types that can be read back out of a [`Value`].
///
/// `from_value` returns `None` when the text is not a valid `Self`; [`Value::get`] turns that
/// into the default.
pub trait FromValue: Sized + Default {
    fn from_value(text: &str) -> Option<Self>;
}

macro_rules! impl_numeric {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> String {
                    self.to_string()
                }
            }

            impl FromValue for $t {
                fn from_value(text: &str) -> Option<Self> {
                    trim(text).parse().ok()
                }
            }
        )*
    };
}

impl_numeric!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

impl ToValue for bool {
    fn to_value(&self) -> String {
        self.to_string()
    }
}

impl FromValue for bool {
    fn from_value(text: &str) -> Option<Self> {
        let text = trim(text);

        if text == "1" || text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text == "0" || text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl ToValue for str {
    fn to_value(&self) -> String {
        self.to_owned()
    }
}

impl ToValue for String {
    fn to_value(&self) -> String {
        self.clone()
    }
}

impl ToValue for char {
    fn to_value(&self) -> String {
        self.to_string()
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> String {
        (**self).to_value()
    }
}

impl FromValue for char {
    fn from_value(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(text: &str) -> Option<Self> {
        Some(text.to_owned())
    }
}
