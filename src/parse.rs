//! Helper macros for parsing packed structs.
//!
//! The format is pretty much like `bincode` for structs,
//! but we do not want to rely on bincode just for this.
//! Every field failure is reported as a [`FieldError`]
//! naming the field that could not be read.
#![allow(unused_macros, dead_code)]

use std::io::{self, ErrorKind, Read};

use byteordered::{byteorder::ReadBytesExt, ByteOrdered, Endian};
use thiserror::Error;

/// Declare a [`Parseable`] struct.
///
/// A make-do for a derive macro. Supports only simple structs
/// without generics.
macro_rules! declare_parseable_struct {
    (
        $(#[$smeta:meta])*
            $svis:vis struct $sname:ident {
                #format => $errh:expr,
                $($(#[$fmeta:meta])* $fvis:vis $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
            }
    ) => {

        $(#[$smeta])*
            $svis struct $sname {
                $($(#[$fmeta])* $fvis $name: declaration_type!($ty $(as $ty2)?)),*
            }

        impl crate::parse::Parseable for $sname {
            type Error = crate::parse::FieldError;
            fn parse<T: byteordered::byteorder::ReadBytesExt, E: byteordered::Endian>(
                r: &mut byteordered::ByteOrdered<T, E>,
            ) -> ::std::result::Result<Self, Self::Error> {
                parse_as_bindings!(
                    r, #format => $errh,
                    $( $name $(as $err)? => $ty $(as $ty2)? ),*
                );
                Ok($sname {
                    $( $name ),*
                })
            }
        }
    };
    (
        $(#[$smeta:meta])*
            $svis:vis struct $sname:ident {
                $($(#[$fmeta:meta])* $fvis:vis $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
            }
    ) => {
        declare_parseable_struct! {
            $(#[$smeta])*
                $svis struct $sname {
                    #format => |e| format!("{}.{}", stringify!($sname), e),
                    $($(#[$fmeta])* $fvis $name $(as $err)? => $ty $(as $ty2)?),*
                }
        }
    };
}

/// Declare multiple [`Parseable`] structs.
macro_rules! declare_parseable_structs {
    (
        $(
            $(#[$smeta:meta])*
                $svis:vis struct $sname:ident {
                    $($tt:tt)*
                }
        )*
    ) => {
        $(
            declare_parseable_struct! {
                $(#[$smeta])*
                    $svis struct $sname {
                        $($tt)*
                    }
            }
        )*
    };
}

/// Helper macro that expands to the parsed type or the
/// converted type.
macro_rules! declaration_type {
    ($ty:ty as $ty2:ty) => {
        $ty2
    };
    ($ty:ty) => {
        $ty
    };
}

/// Generate `let` bindings by parsing a reader.
macro_rules! parse_as_bindings {
    (
        $rdr: expr, #format => $errh:expr,
        $( $name:ident $(as $err:expr)? => $ty:ty $(as $ty2:ty)? ),* $(,)?
    ) => {
        #[allow(unused_parens)]
        let ($($name),*) = parse_from_reader!(
            $rdr, $errh,
            $( $ty $(as $ty2)? => stringify_binding!($name $(as $err)?) ),*
        );
    };
}

/// Helper macro to generate error context as a given
/// expression, or default to identifier name.
macro_rules! stringify_binding {
    ($name: ident as $err:expr) => {
        $err
    };
    ($name: ident) => {
        stringify!($name)
    };
}

/// Generate expression that evaluates to tuple of values
/// parsed from a reader.
macro_rules! parse_from_reader {
    ($rdr: expr, $errh: expr, $( $ty:ty $(as $ty2:ty)? => $err:expr ),* $(,)?) => {{
        let rdr = $rdr;
        ($(
            <$ty as crate::parse::Parseable>::parse(&mut *rdr)
                .map_err(|e| crate::parse::FieldError::new(($errh)($err), e))?
                $(as $ty2)?
        ),*)
    }};
}

/// A field of a packed struct could not be read.
#[derive(Debug, Error)]
#[error("parsing field `{field}`")]
pub struct FieldError {
    pub field: String,
    #[source]
    pub source: io::Error,
}

impl FieldError {
    pub(crate) fn new<E: Into<io::Error>>(field: String, source: E) -> Self {
        FieldError {
            field,
            source: source.into(),
        }
    }
}

// Nested structs surface as io errors of their parent field.
impl From<FieldError> for io::Error {
    fn from(e: FieldError) -> Self {
        io::Error::new(e.source.kind(), e)
    }
}

pub(crate) trait Parseable: Sized {
    type Error: Into<io::Error>;
    fn parse<T: ReadBytesExt, E: Endian>(r: &mut ByteOrdered<T, E>) -> Result<Self, Self::Error>;
}

macro_rules! impl_parseable {
    ($ty:ty, $method:ident) => {
        impl Parseable for $ty {
            type Error = io::Error;
            fn parse<T: ReadBytesExt, E: Endian>(
                r: &mut ByteOrdered<T, E>,
            ) -> Result<Self, io::Error> {
                r.$method()
            }
        }
    };
}

impl_parseable!(u8, read_u8);
impl_parseable!(i8, read_i8);
impl_parseable!(u16, read_u16);
impl_parseable!(i16, read_i16);
impl_parseable!(u32, read_u32);
impl_parseable!(i32, read_i32);
impl_parseable!(u64, read_u64);
impl_parseable!(i64, read_i64);

impl<Ty, const N: usize> Parseable for [Ty; N]
where
    Ty: Parseable + Default + Copy,
{
    type Error = io::Error;
    fn parse<T: ReadBytesExt, E: Endian>(r: &mut ByteOrdered<T, E>) -> Result<Self, io::Error> {
        let mut out = [Ty::default(); N];
        for slot in out.iter_mut() {
            *slot = Ty::parse(r).map_err(Into::into)?;
        }
        Ok(out)
    }
}

/// Read into `buf` until it is full or the reader is
/// exhausted. Returns the number of bytes read.
pub(crate) fn read_up_to<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
