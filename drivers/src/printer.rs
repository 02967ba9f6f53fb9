/*++

Licensed under the Apache-2.0 license.

File Name:

    printer.rs

Abstract:

    File contains support routines and macros to print diagnostics

--*/
use core::convert::Infallible;
use ufmt::{uDisplay, uWrite};

/// Diagnostic sink. Writes to stdout under `std`, discards otherwise.
pub struct Printer;

impl uWrite for Printer {
    type Error = Infallible;

    fn write_str(&mut self, _str: &str) -> Result<(), Self::Error> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                print!("{_str}");
            }
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! cprintln {
    ($($tt:tt)*) => {{
        let _ = ufmt::uwriteln!(&mut $crate::printer::Printer, $($tt)*);
    }}
}

/// Upper case hex rendering of a byte string
pub struct HexBytes<'a>(pub &'a [u8]);
impl uDisplay for HexBytes<'_> {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        for &x in self.0.iter() {
            for c in [x >> 4, x & 0xf] {
                if c < 10 {
                    f.write_char((c + b'0') as char)?;
                } else {
                    f.write_char((c - 10 + b'A') as char)?;
                }
            }
        }
        Ok(())
    }
}
