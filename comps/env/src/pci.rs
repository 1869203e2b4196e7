// SPDX-License-Identifier: MPL-2.0

use core::{fmt, str::FromStr};

use bounded_str::{copy, cstr_len, split};
use nix::errno::Errno;

use crate::error::{Error, Result, return_errno_with_message};

/// Longest accepted address string, "DDDD:BB:DD.F" plus room for a NUL.
const PCI_ADDR_BUF_LEN: usize = 16;

/// A PCI function address, written `DDDD:BB:DD.F` in hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PciAddress {
    domain: u16,
    bus: u8,
    device: u8,
    function: u8,
}

impl PciAddress {
    pub const MAX_DEVICE: u8 = 0x1f;
    pub const MAX_FUNCTION: u8 = 0x7;

    pub fn new(domain: u16, bus: u8, device: u8, function: u8) -> Result<Self> {
        if device > Self::MAX_DEVICE || function > Self::MAX_FUNCTION {
            return_errno_with_message!(Errno::EINVAL, "PCI device or function out of range");
        }
        Ok(Self {
            domain,
            bus,
            device,
            function,
        })
    }

    /// Parses `DDDD:BB:DD.F`, or `BB:DD.F` with domain 0.
    ///
    /// The input is copied into a bounded buffer and tokenized in place, so
    /// an over-long or malformed string from sysfs or the command line is
    /// rejected without allocating.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() >= PCI_ADDR_BUF_LEN {
            return_errno_with_message!(Errno::EINVAL, "bad PCI address length");
        }

        let mut buf = [0u8; PCI_ADDR_BUF_LEN];
        copy(&mut buf, s.as_bytes())?;
        if cstr_len(&buf) != s.len() {
            return_errno_with_message!(Errno::EINVAL, "NUL in PCI address");
        }

        let mut slots = [&[][..]; 4];
        let fields = split(&mut buf, b':', &mut slots)?;
        let (domain, bus, devfn) = match &fields[..] {
            [domain, bus, devfn] => (parse_hex(domain, 4)?, parse_hex(bus, 2)?, *devfn),
            [bus, devfn] => (0, parse_hex(bus, 2)?, *devfn),
            _ => return_errno_with_message!(Errno::EINVAL, "bad PCI address format"),
        };

        let mut devfn_buf = [0u8; PCI_ADDR_BUF_LEN];
        copy(&mut devfn_buf, devfn)?;
        let mut slots = [&[][..]; 3];
        let (device, function) = match &split(&mut devfn_buf, b'.', &mut slots)?[..] {
            [device, function] => (parse_hex(device, 2)?, parse_hex(function, 1)?),
            _ => return_errno_with_message!(Errno::EINVAL, "bad PCI device.function"),
        };

        Self::new(domain as u16, bus as u8, device as u8, function as u8)
    }

    pub fn domain(&self) -> u16 {
        self.domain
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    pub fn device(&self) -> u8 {
        self.device
    }

    pub fn function(&self) -> u8 {
        self.function
    }

    /// Returns the device number as printed in the address. The virtual
    /// functions of one device share it.
    pub fn vf_prefix(&self) -> String {
        format!("{:02x}", self.device)
    }
}

/// Parses a hexadecimal field of 1 to `max_digits` digits.
fn parse_hex(field: &[u8], max_digits: usize) -> Result<u32> {
    if field.is_empty() || field.len() > max_digits || !field.iter().all(u8::is_ascii_hexdigit) {
        return_errno_with_message!(Errno::EINVAL, "bad hexadecimal field in PCI address");
    }
    let field = core::str::from_utf8(field).map_err(|_| Error::new(Errno::EINVAL))?;
    u32::from_str_radix(field, 16).map_err(|_| Error::new(Errno::EINVAL))
}

impl FromStr for PciAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_full_address() {
        let addr = PciAddress::parse("0000:3b:00.1").unwrap();
        assert_eq!(addr, PciAddress::new(0, 0x3b, 0, 1).unwrap());
        assert_eq!(addr.to_string(), "0000:3b:00.1");
    }

    #[test]
    fn parse_short_address() {
        let addr: PciAddress = "af:1f.7".parse().unwrap();
        assert_eq!(addr.domain(), 0);
        assert_eq!(addr.bus(), 0xaf);
        assert_eq!(addr.device(), 0x1f);
        assert_eq!(addr.function(), 7);
        assert_eq!(addr.to_string(), "0000:af:1f.7");
    }

    #[test]
    fn parse_upper_case_domain() {
        let addr = PciAddress::parse("ABCD:01:02.3").unwrap();
        assert_eq!(addr.domain(), 0xabcd);
        assert_eq!(addr.vf_prefix(), "02");
    }

    #[test]
    fn reject_malformed_addresses() {
        for s in [
            "",
            "3b",
            "0000:3b:00",
            "0000:3b:00.8",
            "0000:3b:20.0",
            "00000:3b:00.0",
            "0000:3b:00.1.2",
            "0000:3b::00.1",
            "a:b:c:d.0",
            "0000:3g:00.0",
            "0000:3b:00.1\0",
            "0000:3b:00.1/../../..",
        ] {
            let err = PciAddress::parse(s).unwrap_err();
            assert_eq!(err.errno(), Errno::EINVAL, "{:?}", s);
        }
    }
}
