//! Binary parsing utilities.
//!
//! Records and lazy arrays come from `ttf-parser`. [`Stream`] wraps them in
//! a cursor that reports a read past the end of the data, or past a
//! configured bound, as an [`Error::StreamOverflow`] rather than a silent
//! zero.

pub use ttf_parser::{FromData, LazyArray16, LazyArray32};

use crate::{Error, Result};

/// A 16-bit offset from the start of the enclosing table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Offset16(pub u16);

impl Offset16 {
    #[inline]
    pub fn to_usize(self) -> usize {
        usize::from(self.0)
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl FromData for Offset16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Offset16)
    }
}

/// A 32-bit offset from the start of the enclosing table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Offset32(pub u32);

impl Offset32 {
    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl FromData for Offset32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Offset32)
    }
}

/// Returns the data starting at `offset`, failing when it points past the end.
#[inline]
pub fn slice_from(data: &[u8], offset: usize) -> Result<&[u8]> {
    data.get(offset..).ok_or(Error::StreamOverflow { offset, len: 0 })
}

/// A cursor over a byte slice.
///
/// The cursor never owns its data and only ever moves by reading or seeking.
#[derive(Clone, Copy, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
    bound: Option<usize>,
    swap_endianness: bool,
}

impl<'a> Stream<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0, bound: None, swap_endianness: false }
    }

    /// Creates a stream positioned at `offset`.
    #[inline]
    pub fn new_at(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset <= data.len() {
            Ok(Stream { data, offset, bound: None, swap_endianness: false })
        } else {
            Err(Error::StreamOverflow { offset, len: 0 })
        }
    }

    /// Limits all reads to the first `bound` bytes of the data.
    #[inline]
    pub fn with_bound(mut self, bound: usize) -> Self {
        self.bound = Some(bound);
        self
    }

    /// Reads integers in host (little-endian) order instead of table order.
    ///
    /// Only the integer readers honor this flag. Records read through
    /// [`FromData`] keep their on-disk layout.
    #[inline]
    pub fn swapped(mut self) -> Self {
        self.swap_endianness = true;
        self
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn limit(&self) -> usize {
        match self.bound {
            Some(bound) => bound.min(self.data.len()),
            None => self.data.len(),
        }
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.limit()
    }

    /// Moves the cursor by `delta` bytes in either direction.
    pub fn seek(&mut self, delta: isize) -> Result<()> {
        let target = self
            .offset
            .checked_add_signed(delta)
            .filter(|target| *target <= self.limit())
            .ok_or(Error::StreamOverflow { offset: self.offset, len: delta.unsigned_abs() })?;
        self.offset = target;
        Ok(())
    }

    #[inline]
    pub fn skip<T: FromData>(&mut self) -> Result<()> {
        self.read_bytes(T::SIZE).map(|_| ())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let overflow = Error::StreamOverflow { offset: self.offset, len };
        let end = self.offset.checked_add(len).ok_or(overflow)?;
        if end > self.limit() {
            return Err(Error::StreamOverflow { offset: self.offset, len });
        }

        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    #[inline]
    pub fn read<T: FromData>(&mut self) -> Result<T> {
        let offset = self.offset;
        let bytes = self.read_bytes(T::SIZE)?;
        T::parse(bytes).ok_or(Error::StreamOverflow { offset, len: T::SIZE })
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        let value: u16 = self.read()?;
        Ok(if self.swap_endianness { value.swap_bytes() } else { value })
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_u16().map(|v| v as i16)
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        let value: u32 = self.read()?;
        Ok(if self.swap_endianness { value.swap_bytes() } else { value })
    }

    pub fn read_array16<T: FromData>(&mut self, count: u16) -> Result<LazyArray16<'a, T>> {
        let len = usize::from(count) * T::SIZE;
        self.read_bytes(len).map(LazyArray16::new)
    }

    pub fn read_array32<T: FromData>(&mut self, count: u32) -> Result<LazyArray32<'a, T>> {
        let len = count as usize * T::SIZE;
        self.read_bytes(len).map(LazyArray32::new)
    }

    /// Reads an `Offset16` and returns `data` starting at it.
    pub fn read_at_offset16(&mut self, data: &'a [u8]) -> Result<&'a [u8]> {
        let offset = self.read::<Offset16>()?.to_usize();
        slice_from(data, offset)
    }

    /// Like [`read_at_offset16`](Self::read_at_offset16), but a null offset is `None`.
    pub fn read_at_optional_offset16(&mut self, data: &'a [u8]) -> Result<Option<&'a [u8]>> {
        let offset = self.read::<Offset16>()?;
        if offset.is_null() {
            Ok(None)
        } else {
            slice_from(data, offset.to_usize()).map(Some)
        }
    }

    pub fn read_at_offset32(&mut self, data: &'a [u8]) -> Result<&'a [u8]> {
        let offset = self.read::<Offset32>()?.to_usize();
        slice_from(data, offset)
    }
}

/// An array of 16-bit offsets relative to `data`.
#[derive(Clone, Copy, Debug)]
pub struct Offsets16<'a> {
    data: &'a [u8],
    offsets: LazyArray16<'a, Offset16>,
}

impl<'a> Offsets16<'a> {
    pub fn read(s: &mut Stream<'a>, count: u16, data: &'a [u8]) -> Result<Self> {
        let offsets = s.read_array16(count)?;
        Ok(Offsets16 { data, offsets })
    }

    #[inline]
    pub fn len(&self) -> u16 {
        self.offsets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the data the offset at `index` points to.
    pub fn slice(&self, index: u16) -> Result<&'a [u8]> {
        let offset = self
            .offsets
            .get(index)
            .ok_or(Error::StreamOverflow { offset: usize::from(index) * 2, len: 2 })?;
        slice_from(self.data, offset.to_usize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian() {
        let data = [0x00, 0x01, 0x12, 0x34, 0x56, 0x78, 0xFF, 0xFE];
        let mut s = Stream::new(&data);
        assert_eq!(s.read_u16().unwrap(), 1);
        assert_eq!(s.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(s.read_i16().unwrap(), -2);
        assert!(s.at_end());
    }

    #[test]
    fn swapped_reads_host_order() {
        let data = [0x01, 0x00, 0x78, 0x56, 0x34, 0x12];
        let mut s = Stream::new(&data).swapped();
        assert_eq!(s.read_u16().unwrap(), 1);
        assert_eq!(s.read_u32().unwrap(), 0x1234_5678);
    }

    #[test]
    fn overflow_is_an_error() {
        let data = [0x00, 0x01, 0x02];
        let mut s = Stream::new(&data);
        assert_eq!(s.read_u16().unwrap(), 1);
        assert!(matches!(s.read_u16(), Err(Error::StreamOverflow { offset: 2, len: 2 })));
        // A failed read does not move the cursor.
        assert_eq!(s.offset(), 2);
        assert_eq!(s.read_u8().unwrap(), 2);
    }

    #[test]
    fn bound_limits_reads() {
        let data = [0, 1, 0, 2, 0, 3];
        let mut s = Stream::new(&data).with_bound(4);
        assert_eq!(s.read_u16().unwrap(), 1);
        assert_eq!(s.read_u16().unwrap(), 2);
        assert!(s.at_end());
        assert!(s.read_u16().is_err());
    }

    #[test]
    fn seek() {
        let data = [0, 1, 0, 2, 0, 3];
        let mut s = Stream::new(&data);
        s.seek(4).unwrap();
        assert_eq!(s.read_u16().unwrap(), 3);
        s.seek(-4).unwrap();
        assert_eq!(s.read_u16().unwrap(), 2);
        assert!(s.seek(-10).is_err());
        assert!(s.seek(10).is_err());
    }

    #[test]
    fn lazy_array_search() {
        let data = [0, 1, 0, 5, 0, 9, 0, 12];
        let array = LazyArray16::<u16>::new(&data);
        assert_eq!(array.len(), 4);
        assert_eq!(array.binary_search_by(|v| v.cmp(&9)), Some((2, 9)));
        assert_eq!(array.binary_search_by(|v| v.cmp(&4)), None);
        assert_eq!(array.get(4), None);
    }

    #[test]
    fn offsets_resolve_against_parent() {
        let data = [0, 2, 0, 6, 0, 10, 0, 7, 0, 9, 0, 4];
        let mut s = Stream::new(&data);
        let count = s.read_u16().unwrap();
        let offsets = Offsets16::read(&mut s, count, &data).unwrap();
        assert_eq!(offsets.len(), 2);
        assert_eq!(offsets.slice(0).unwrap(), &[0, 7, 0, 9, 0, 4]);
        assert_eq!(offsets.slice(1).unwrap(), &[0, 4]);
        assert!(offsets.slice(2).is_err());

        let array = Stream::new(&data[6..]).read_array16::<u16>(3).unwrap();
        let values: Vec<u16> = array.into_iter().collect();
        assert_eq!(values, [7, 9, 4]);
    }
}
