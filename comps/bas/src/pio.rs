// SPDX-License-Identifier: MPL-2.0

/// A failed programmed I/O access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PioFault;

/// A sink for 64-bit programmed I/O register writes.
///
/// Offsets are byte offsets into the BAR that holds the BAS registers.
pub trait PioWrite {
    /// Returns whether the register window is mapped and may be written.
    fn is_mapped(&self) -> bool {
        true
    }

    fn write(&mut self, offset: u64, value: u64) -> Result<(), PioFault>;
}

/// A source of 64-bit programmed I/O register reads.
pub trait PioRead {
    fn read(&mut self, offset: u64) -> Result<u64, PioFault>;
}

impl<T: PioWrite + ?Sized> PioWrite for &mut T {
    fn is_mapped(&self) -> bool {
        (**self).is_mapped()
    }

    fn write(&mut self, offset: u64, value: u64) -> Result<(), PioFault> {
        (**self).write(offset, value)
    }
}

impl<T: PioRead + ?Sized> PioRead for &mut T {
    fn read(&mut self, offset: u64) -> Result<u64, PioFault> {
        (**self).read(offset)
    }
}
