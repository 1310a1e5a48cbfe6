//! This module defines shared traits used across different kernels.

use crate::types::DataType;

/// A fixed-width primitive that can be written to and read from the wire in
/// little-endian byte order.
pub trait WireElement: Copy + Default + PartialEq + std::fmt::Debug {
    /// The number of bytes one element occupies on the wire.
    const WIDTH: usize;
    /// The `ByteArray` type tag recorded for arrays of this element.
    const DATA_TYPE: DataType;

    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one element from a chunk of exactly `WIDTH` bytes.
    fn read_le(chunk: &[u8]) -> Self;
}

// Implement the trait for every primitive type the wire format knows about.
macro_rules! impl_wire_element {
    ($T:ty, $width:expr, $tag:expr) => {
        impl WireElement for $T {
            const WIDTH: usize = $width;
            const DATA_TYPE: DataType = $tag;

            #[inline]
            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            #[inline]
            fn read_le(chunk: &[u8]) -> Self {
                let mut buf = [0u8; $width];
                buf.copy_from_slice(chunk);
                <$T>::from_le_bytes(buf)
            }
        }
    };
}

impl_wire_element!(i8, 1, DataType::Int8);
impl_wire_element!(i16, 2, DataType::Int16);
impl_wire_element!(i32, 4, DataType::Int32);
impl_wire_element!(u8, 1, DataType::Uint8);
impl_wire_element!(u16, 2, DataType::Uint16);
impl_wire_element!(f32, 4, DataType::Float32);
impl_wire_element!(f64, 8, DataType::Float64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_element_is_little_endian() {
        let mut out = Vec::new();
        0x0102i16.write_le(&mut out);
        assert_eq!(out, vec![0x02, 0x01]);
        assert_eq!(i16::read_le(&out), 0x0102);
    }

    #[test]
    fn test_wire_element_tags_and_widths() {
        assert_eq!(<u16 as WireElement>::WIDTH, 2);
        assert_eq!(<f64 as WireElement>::WIDTH, 8);
        assert_eq!(<i8 as WireElement>::DATA_TYPE, DataType::Int8);
        assert_eq!(<f32 as WireElement>::DATA_TYPE, DataType::Float32);
    }
}
