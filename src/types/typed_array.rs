//! The value that flows through an encoder chain.
//!
//! Each transform consumes one `TypedArray` and produces another; a chain is
//! complete once the value has become a `Uint8` byte array.

use super::data_type::{ArrayKind, IntDataType};

#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Uint8(Vec<u8>),
    Uint16(Vec<u16>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    /// A generic sequence of optional strings; `None` is an absent value.
    Strings(Vec<Option<String>>),
}

macro_rules! impl_from_vec {
    ($T:ty, $variant:ident) => {
        impl From<Vec<$T>> for TypedArray {
            fn from(v: Vec<$T>) -> Self {
                TypedArray::$variant(v)
            }
        }
    };
}

impl_from_vec!(i8, Int8);
impl_from_vec!(i16, Int16);
impl_from_vec!(i32, Int32);
impl_from_vec!(u8, Uint8);
impl_from_vec!(u16, Uint16);
impl_from_vec!(f32, Float32);
impl_from_vec!(f64, Float64);
impl_from_vec!(Option<String>, Strings);

impl From<Vec<String>> for TypedArray {
    fn from(v: Vec<String>) -> Self {
        TypedArray::Strings(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for TypedArray {
    fn from(v: Vec<&str>) -> Self {
        TypedArray::Strings(v.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl TypedArray {
    pub fn kind(&self) -> ArrayKind {
        match self {
            Self::Int8(_) => ArrayKind::Int8,
            Self::Int16(_) => ArrayKind::Int16,
            Self::Int32(_) => ArrayKind::Int32,
            Self::Uint8(_) => ArrayKind::Uint8,
            Self::Uint16(_) => ArrayKind::Uint16,
            Self::Float32(_) => ArrayKind::Float32,
            Self::Float64(_) => ArrayKind::Float64,
            Self::Strings(_) => ArrayKind::String,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Strings(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A zero-filled numeric array, or a vector of `None` for `ArrayKind::String`.
    pub fn zeroed(kind: ArrayKind, len: usize) -> Self {
        match kind {
            ArrayKind::Int8 => Self::Int8(vec![0; len]),
            ArrayKind::Int16 => Self::Int16(vec![0; len]),
            ArrayKind::Int32 => Self::Int32(vec![0; len]),
            ArrayKind::Uint8 => Self::Uint8(vec![0; len]),
            ArrayKind::Uint16 => Self::Uint16(vec![0; len]),
            ArrayKind::Float32 => Self::Float32(vec![0.0; len]),
            ArrayKind::Float64 => Self::Float64(vec![0.0; len]),
            ArrayKind::String => Self::Strings(vec![None; len]),
        }
    }

    /// Widens any integer array to `i32`. Returns `None` for float and string arrays.
    pub fn to_i32_vec(&self) -> Option<Vec<i32>> {
        match self {
            Self::Int8(v) => Some(v.iter().map(|&x| x as i32).collect()),
            Self::Int16(v) => Some(v.iter().map(|&x| x as i32).collect()),
            Self::Int32(v) => Some(v.clone()),
            Self::Uint8(v) => Some(v.iter().map(|&x| x as i32).collect()),
            Self::Uint16(v) => Some(v.iter().map(|&x| x as i32).collect()),
            _ => None,
        }
    }

    /// Narrows `i32` values into an array of the given integer type, wrapping
    /// like a fixed-width store would.
    pub fn from_i32_values(src_type: IntDataType, values: Vec<i32>) -> Self {
        match src_type {
            IntDataType::Int8 => Self::Int8(values.into_iter().map(|x| x as i8).collect()),
            IntDataType::Int16 => Self::Int16(values.into_iter().map(|x| x as i16).collect()),
            IntDataType::Int32 => Self::Int32(values),
            IntDataType::Uint8 => Self::Uint8(values.into_iter().map(|x| x as u8).collect()),
            IntDataType::Uint16 => Self::Uint16(values.into_iter().map(|x| x as u16).collect()),
        }
    }

    /// Stores a numeric value at `index`. String arrays receive its decimal form.
    pub fn set_f64(&mut self, index: usize, value: f64) {
        match self {
            Self::Int8(v) => v[index] = value as i64 as i8,
            Self::Int16(v) => v[index] = value as i64 as i16,
            Self::Int32(v) => v[index] = value as i64 as i32,
            Self::Uint8(v) => v[index] = value as i64 as u8,
            Self::Uint16(v) => v[index] = value as i64 as u16,
            Self::Float32(v) => v[index] = value as f32,
            Self::Float64(v) => v[index] = value,
            Self::Strings(v) => v[index] = Some(value.to_string()),
        }
    }

    /// Reads the element at `index` as a number, parsing string elements.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            Self::Int8(v) => v.get(index).map(|&x| x as f64),
            Self::Int16(v) => v.get(index).map(|&x| x as f64),
            Self::Int32(v) => v.get(index).map(|&x| x as f64),
            Self::Uint8(v) => v.get(index).map(|&x| x as f64),
            Self::Uint16(v) => v.get(index).map(|&x| x as f64),
            Self::Float32(v) => v.get(index).map(|&x| x as f64),
            Self::Float64(v) => v.get(index).copied(),
            Self::Strings(v) => v
                .get(index)
                .and_then(|s| s.as_deref())
                .and_then(|s| s.trim().parse::<f64>().ok()),
        }
    }

    /// Reads the element at `index` as a string, formatting numeric elements.
    pub fn get_string(&self, index: usize) -> Option<String> {
        match self {
            Self::Strings(v) => v.get(index).cloned().flatten(),
            Self::Float32(v) => v.get(index).map(|x| x.to_string()),
            _ => self.get_f64(index).map(|x| x.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_len() {
        let a = TypedArray::from(vec![1i16, 2, 3]);
        assert_eq!(a.kind(), ArrayKind::Int16);
        assert_eq!(a.len(), 3);
        assert!(TypedArray::Strings(vec![]).is_empty());
    }

    #[test]
    fn test_i32_widening_and_narrowing() {
        let a = TypedArray::from(vec![255u8, 0, 7]);
        assert_eq!(a.to_i32_vec(), Some(vec![255, 0, 7]));
        assert_eq!(TypedArray::from(vec![1.0f32]).to_i32_vec(), None);

        let narrowed = TypedArray::from_i32_values(IntDataType::Int8, vec![-1, 127, 128]);
        assert_eq!(narrowed, TypedArray::Int8(vec![-1, 127, -128]));
    }

    #[test]
    fn test_accessors_cross_types() {
        let nums = TypedArray::from(vec![1.5f64, 2.0]);
        assert_eq!(nums.get_string(0).as_deref(), Some("1.5"));
        assert_eq!(nums.get_string(1).as_deref(), Some("2"));

        let strs = TypedArray::from(vec!["12", "x"]);
        assert_eq!(strs.get_f64(0), Some(12.0));
        assert_eq!(strs.get_f64(1), None);
        assert_eq!(strs.get_f64(9), None);
    }

    #[test]
    fn test_zeroed_and_set() {
        let mut a = TypedArray::zeroed(ArrayKind::Int32, 3);
        a.set_f64(1, 42.0);
        assert_eq!(a, TypedArray::Int32(vec![0, 42, 0]));

        let mut s = TypedArray::zeroed(ArrayKind::String, 2);
        s.set_f64(0, 3.0);
        assert_eq!(s, TypedArray::Strings(vec![Some("3".into()), None]));
    }
}
