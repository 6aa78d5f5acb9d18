//! Cursor-style little-endian reader used by every packet parser.

use crate::error::DecodeError;

/// Cursor-style byte reader for little-endian binary data.
///
/// Every read is bounds-checked; a short buffer yields
/// [`DecodeError::Truncated`] instead of a panic.
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self
            .pos
            .checked_add(N)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or(DecodeError::Truncated {
                offset: self.pos,
                needed: N,
                len: self.data.len(),
            })?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        self.pos = self.pos.saturating_add(N);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        self.take::<1>().map(|[b]| b)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, DecodeError> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    #[inline]
    pub fn u16_le(&mut self) -> Result<u16, DecodeError> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    #[inline]
    pub fn i16_le(&mut self) -> Result<i16, DecodeError> {
        self.take::<2>().map(i16::from_le_bytes)
    }

    #[inline]
    pub fn u32_le(&mut self) -> Result<u32, DecodeError> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64_le(&mut self) -> Result<u64, DecodeError> {
        self.take::<8>().map(u64::from_le_bytes)
    }

    /// Non-finite values are mapped to `0.0` so downstream JSON stays valid.
    #[inline]
    pub fn f32_le(&mut self) -> Result<f32, DecodeError> {
        self.take::<4>()
            .map(f32::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, DecodeError> {
        self.take::<8>()
            .map(f64::from_le_bytes)
            .map(|v| if v.is_finite() { v } else { 0.0 })
    }

    pub fn u8_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.take::<N>()
    }

    pub fn u16_le_array<const N: usize>(&mut self) -> Result<[u16; N], DecodeError> {
        let mut arr = [0u16; N];
        for item in arr.iter_mut() {
            *item = self.u16_le()?;
        }
        Ok(arr)
    }

    pub fn f32_le_array<const N: usize>(&mut self) -> Result<[f32; N], DecodeError> {
        let mut arr = [0.0f32; N];
        for item in arr.iter_mut() {
            *item = self.f32_le()?;
        }
        Ok(arr)
    }

    /// Read a fixed-width, NUL-padded UTF-8 string.
    pub fn fixed_str<const N: usize>(&mut self) -> Result<String, DecodeError> {
        let raw = self.take::<N>()?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(N);
        let text = raw.get(..end).unwrap_or_default();
        Ok(String::from_utf8_lossy(text).into_owned())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        let end = self.pos.saturating_add(n);
        if end > self.data.len() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n,
                len: self.data.len(),
            });
        }
        self.pos = end;
        Ok(())
    }
}
