/*++

Licensed under the Apache-2.0 license.

File Name:

    array.rs

Abstract:

    File contains common word array definitions used for MAC tags.

--*/

macro_rules! array4 {
    ($dim: literal) => {
        paste::paste! {
             pub const [<ARRAY_4X $dim _BYTE_SIZE>]: usize = $dim * core::mem::size_of::<u32>();
             pub const [<ARRAY_4X $dim _WORD_SIZE>]: usize = $dim ;

             /// Big-endian word array
             #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
             pub struct [<Array4x $dim>](pub [u32; [<ARRAY_4X $dim _WORD_SIZE>]]);

             impl [<Array4x $dim>] {
                 pub const fn new(val: [u32; [<ARRAY_4X $dim _WORD_SIZE>]]) -> Self {
                     Self(val)
                 }
             }

             impl From<[u8; [<ARRAY_4X $dim _BYTE_SIZE>]]> for [<Array4x $dim>] {
                 #[inline(never)]
                 fn from(value: [u8; [<ARRAY_4X $dim _BYTE_SIZE>]]) -> Self {
                     Self::from(&value)
                 }
             }

             impl<'a> From<&'a [u8; [<ARRAY_4X $dim _BYTE_SIZE>]]> for [<Array4x $dim>] {
                 #[inline(never)]
                 fn from(value: &'a [u8; [<ARRAY_4X $dim _BYTE_SIZE>]]) -> Self {
                     let mut result = [<Array4x $dim>]([0u32; [<ARRAY_4X $dim _WORD_SIZE>]]);

                     for (word, bytes) in result.0.iter_mut().zip(value.chunks_exact(4)) {
                         *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                     }

                     result
                 }
             }

             impl From<[<Array4x $dim>]> for [u8; [<ARRAY_4X $dim _BYTE_SIZE>]] {
                 #[inline(never)]
                 fn from(value: [<Array4x $dim>]) -> Self {
                     let mut result = [0u8; [<ARRAY_4X $dim _BYTE_SIZE>]];

                     for (bytes, word) in result.chunks_exact_mut(4).zip(value.0.iter()) {
                         bytes.copy_from_slice(&word.to_be_bytes());
                     }

                     result
                 }
             }

             impl From<[u32; [<ARRAY_4X $dim _WORD_SIZE>]]> for [<Array4x $dim>] {
                 #[inline(never)]
                 fn from(value: [u32; [<ARRAY_4X $dim _WORD_SIZE>]]) -> Self {
                     [<Array4x $dim>](value)
                 }
             }

             impl From<[<Array4x $dim>]> for [u32; [<ARRAY_4X $dim _WORD_SIZE>]] {
                 #[inline(never)]
                 fn from(value: [<Array4x $dim>]) -> Self {
                     value.0
                 }
             }
        }
    };
}

array4!(8);
array4!(12);
array4!(16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_byte_order() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0x12;
        bytes[3] = 0x34;
        bytes[31] = 0xff;

        let arr = Array4x8::from(bytes);
        assert_eq!(arr.0[0], 0x1200_0034);
        assert_eq!(arr.0[7], 0x0000_00ff);
        assert_eq!(<[u8; 32]>::from(arr), bytes);
    }
}
