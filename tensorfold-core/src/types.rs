use num_traits::AsPrimitive;
use std::fmt::Debug;

/// Defines the possible data types for tensor elements.
///
/// The engine itself is generic over the element type; `DType` is the runtime
/// tag attached to each [`Element`] so that diagnostics can name the types a
/// reduction reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
    /// 8-bit signed integer type.
    I8,
    /// 16-bit signed integer type.
    I16,
    /// 32-bit signed integer type.
    I32,
    /// 64-bit signed integer type.
    I64,
    /// 8-bit unsigned integer type.
    U8,
    /// 16-bit unsigned integer type.
    U16,
    /// 32-bit unsigned integer type.
    U32,
    /// 64-bit unsigned integer type.
    U64,
    /// Boolean type (true/false values).
    Bool,
}

impl DType {
    /// Size in bytes of one element of this type.
    pub fn size_of(&self) -> usize {
        match self {
            DType::I8 | DType::U8 | DType::Bool => 1,
            DType::I16 | DType::U16 => 2,
            DType::F32 | DType::I32 | DType::U32 => 4,
            DType::F64 | DType::I64 | DType::U64 => 8,
        }
    }
}

/// A trait representing the element types a tensor view can hold and a
/// reduction can accumulate into.
pub trait Element: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// The runtime tag of this element type.
    const DTYPE: DType;
}

macro_rules! impl_element {
    ($($ty:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const DTYPE: DType = DType::$dtype;
            }
        )*
    };
}

impl_element!(
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    bool => Bool,
);

/// Conversion of an input element into the accumulator type of a reduction,
/// with `as` semantics (e.g. `u8 -> u32` when counting, `f32 -> f64` when
/// widening, `bool -> i64` when counting true values).
pub trait ElementCast<U>: Copy {
    fn cast(self) -> U;
}

macro_rules! impl_numeric_cast {
    (@to $src:ty; $($dst:ty),*) => {
        $(
            impl ElementCast<$dst> for $src {
                #[inline(always)]
                fn cast(self) -> $dst {
                    AsPrimitive::<$dst>::as_(self)
                }
            }
        )*
    };
    ($($src:ty),* $(,)?) => {
        $(
            impl_numeric_cast!(@to $src; f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);
        )*
    };
}

impl_numeric_cast!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

macro_rules! impl_bool_cast {
    ($($dst:ty),*) => {
        $(
            impl ElementCast<$dst> for bool {
                #[inline(always)]
                fn cast(self) -> $dst {
                    AsPrimitive::<$dst>::as_(u8::from(self))
                }
            }
        )*
    };
}

impl_bool_cast!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

impl ElementCast<bool> for bool {
    #[inline(always)]
    fn cast(self) -> bool {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dtype_of<T: Element>(_value: T) -> DType {
        T::DTYPE
    }

    #[test]
    fn test_element_dtype_tags() {
        assert_eq!(dtype_of(1.0f32), DType::F32);
        assert_eq!(dtype_of(1i64), DType::I64);
        assert_eq!(dtype_of(true), DType::Bool);
    }

    #[test]
    fn test_element_casts() {
        assert_eq!(ElementCast::<u32>::cast(250u8), 250u32);
        assert_eq!(ElementCast::<i64>::cast(true), 1i64);
        assert_eq!(ElementCast::<f64>::cast(false), 0.0f64);
        assert_eq!(ElementCast::<i32>::cast(-2.7f32), -2);
        assert!(ElementCast::<bool>::cast(true));
    }

    fn tag_size_matches<T: Element>() -> bool {
        T::DTYPE.size_of() == std::mem::size_of::<T>()
    }

    #[test]
    fn test_dtype_size_matches_rust_type() {
        assert!(tag_size_matches::<f32>());
        assert!(tag_size_matches::<f64>());
        assert!(tag_size_matches::<i8>());
        assert!(tag_size_matches::<i16>());
        assert!(tag_size_matches::<i32>());
        assert!(tag_size_matches::<i64>());
        assert!(tag_size_matches::<u8>());
        assert!(tag_size_matches::<u16>());
        assert!(tag_size_matches::<u32>());
        assert!(tag_size_matches::<u64>());
        assert!(tag_size_matches::<bool>());
    }
}
