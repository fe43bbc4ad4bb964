// SPDX-License-Identifier: Apache-2.0

//! Capability flag registry and decoder.
//!
//! Every camera model advertises its hardware capabilities as a 64-bit
//! bitmask (`TOUPCAM_FLAG_xxx` in the vendor header). [`Flag`] mirrors that
//! registry one variant per bit, in header declaration order, and
//! [`Flag::decode`] projects a raw mask into the named flags it activates.
//!
//! Several flags live above bit 31 (GMCY8 through GLOBALSHUTTER), so all
//! bit tests here are on `u64`. Truncating the mask to 32 bits silently
//! drops those capabilities.

use std::fmt;

/// A single vendor capability flag, valued at its bitmask.
#[repr(u64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// cmos sensor
    Cmos = 0x0000_0001,
    /// progressive ccd sensor
    CcdProgressive = 0x0000_0002,
    /// interlaced ccd sensor
    CcdInterlaced = 0x0000_0004,
    /// support hardware ROI
    RoiHardware = 0x0000_0008,
    /// monochromatic
    Mono = 0x0000_0010,
    /// support bin/skip mode
    BinSkipSupported = 0x0000_0020,
    /// usb3.0
    Usb30 = 0x0000_0040,
    /// Thermoelectric Cooler
    Tec = 0x0000_0080,
    /// usb3.0 camera connected to usb2.0 port
    Usb30OverUsb20 = 0x0000_0100,
    /// ST4 port
    St4 = 0x0000_0200,
    /// support to get the temperature of the sensor
    GetTemperature = 0x0000_0400,
    /// support to put the target temperature of the sensor
    PutTemperature = 0x0000_0800,
    /// pixel format, RAW 10 bits
    Raw10 = 0x0000_1000,
    /// pixel format, RAW 12 bits
    Raw12 = 0x0000_2000,
    /// pixel format, RAW 14 bits
    Raw14 = 0x0000_4000,
    /// pixel format, RAW 16 bits
    Raw16 = 0x0000_8000,
    /// cooling fan
    Fan = 0x0001_0000,
    /// Thermoelectric Cooler can be turned on or off
    TecOnOff = 0x0002_0000,
    /// ISP (Image Signal Processing) chip
    Isp = 0x0004_0000,
    /// support software trigger
    TriggerSoftware = 0x0008_0000,
    /// support external trigger
    TriggerExternal = 0x0010_0000,
    /// only support trigger single: one trigger, one image
    TriggerSingle = 0x0020_0000,
    /// support set and get the black level
    BlackLevel = 0x0040_0000,
    /// support auto focus
    AutoFocus = 0x0080_0000,
    /// frame buffer
    Buffer = 0x0100_0000,
    /// use very large capacity DDR for frame buffer
    Ddr = 0x0200_0000,
    /// Conversion Gain: HCG, LCG
    Cg = 0x0400_0000,
    /// pixel format, yuv411
    Yuv411 = 0x0800_0000,
    /// pixel format, yuv422, VUYY
    Vuyy = 0x1000_0000,
    /// pixel format, yuv444
    Yuv444 = 0x2000_0000,
    /// pixel format, RGB888
    Rgb888 = 0x4000_0000,
    /// pixel format, RAW 8 bits
    Raw8 = 0x8000_0000,
    /// pixel format, GMCY, 8 bits
    Gmcy8 = 0x0000_0001_0000_0000,
    /// pixel format, GMCY, 12 bits
    Gmcy12 = 0x0000_0002_0000_0000,
    /// pixel format, yuv422, UYVY
    Uyvy = 0x0000_0004_0000_0000,
    /// Conversion Gain: HCG, LCG, HDR
    CgHdr = 0x0000_0008_0000_0000,
    /// global shutter
    GlobalShutter = 0x0000_0010_0000_0000,
}

impl Flag {
    /// Every flag in vendor header declaration order. [`Flag::decode`]
    /// iterates this table, so decoded output order is deterministic.
    pub const ALL: [Flag; 37] = [
        Flag::Cmos,
        Flag::CcdProgressive,
        Flag::CcdInterlaced,
        Flag::RoiHardware,
        Flag::Mono,
        Flag::BinSkipSupported,
        Flag::Usb30,
        Flag::Tec,
        Flag::Usb30OverUsb20,
        Flag::St4,
        Flag::GetTemperature,
        Flag::PutTemperature,
        Flag::Raw10,
        Flag::Raw12,
        Flag::Raw14,
        Flag::Raw16,
        Flag::Fan,
        Flag::TecOnOff,
        Flag::Isp,
        Flag::TriggerSoftware,
        Flag::TriggerExternal,
        Flag::TriggerSingle,
        Flag::BlackLevel,
        Flag::AutoFocus,
        Flag::Buffer,
        Flag::Ddr,
        Flag::Cg,
        Flag::Yuv411,
        Flag::Vuyy,
        Flag::Yuv444,
        Flag::Rgb888,
        Flag::Raw8,
        Flag::Gmcy8,
        Flag::Gmcy12,
        Flag::Uyvy,
        Flag::CgHdr,
        Flag::GlobalShutter,
    ];

    /// The flag's bitmask value.
    pub const fn mask(self) -> u64 {
        self as u64
    }

    /// The vendor constant name, as spelled in the header
    /// (e.g. `TOUPCAM_FLAG_CGHDR` yields `"CGHDR"`).
    pub const fn name(self) -> &'static str {
        match self {
            Flag::Cmos => "CMOS",
            Flag::CcdProgressive => "CCD_PROGRESSIVE",
            Flag::CcdInterlaced => "CCD_INTERLACED",
            Flag::RoiHardware => "ROI_HARDWARE",
            Flag::Mono => "MONO",
            Flag::BinSkipSupported => "BINSKIP_SUPPORTED",
            Flag::Usb30 => "USB30",
            Flag::Tec => "TEC",
            Flag::Usb30OverUsb20 => "USB30_OVER_USB20",
            Flag::St4 => "ST4",
            Flag::GetTemperature => "GETTEMPERATURE",
            Flag::PutTemperature => "PUTTEMPERATURE",
            Flag::Raw10 => "RAW10",
            Flag::Raw12 => "RAW12",
            Flag::Raw14 => "RAW14",
            Flag::Raw16 => "RAW16",
            Flag::Fan => "FAN",
            Flag::TecOnOff => "TEC_ONOFF",
            Flag::Isp => "ISP",
            Flag::TriggerSoftware => "TRIGGER_SOFTWARE",
            Flag::TriggerExternal => "TRIGGER_EXTERNAL",
            Flag::TriggerSingle => "TRIGGER_SINGLE",
            Flag::BlackLevel => "BLACKLEVEL",
            Flag::AutoFocus => "AUTO_FOCUS",
            Flag::Buffer => "BUFFER",
            Flag::Ddr => "DDR",
            Flag::Cg => "CG",
            Flag::Yuv411 => "YUV411",
            Flag::Vuyy => "VUYY",
            Flag::Yuv444 => "YUV444",
            Flag::Rgb888 => "RGB888",
            Flag::Raw8 => "RAW8",
            Flag::Gmcy8 => "GMCY8",
            Flag::Gmcy12 => "GMCY12",
            Flag::Uyvy => "UYVY",
            Flag::CgHdr => "CGHDR",
            Flag::GlobalShutter => "GLOBALSHUTTER",
        }
    }

    /// Decode a raw 64-bit capability mask into the flags it activates,
    /// in registry declaration order.
    ///
    /// Bits that match no registry entry are ignored; `decode(0)` returns
    /// an empty vector. Never fails.
    pub fn decode(flags: u64) -> Vec<Flag> {
        Flag::ALL
            .iter()
            .copied()
            .filter(|f| flags & f.mask() == f.mask())
            .collect()
    }

    /// Like [`Flag::decode`], but yields the vendor constant names.
    pub fn decode_names(flags: u64) -> Vec<&'static str> {
        Flag::decode(flags).into_iter().map(Flag::name).collect()
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_zero_is_empty() {
        assert!(Flag::decode(0).is_empty());
        assert!(Flag::decode_names(0).is_empty());
    }

    #[test]
    fn test_decode_matches_subset_rule() {
        // every registry entry set
        let all = Flag::ALL.iter().fold(0u64, |acc, f| acc | f.mask());
        assert_eq!(Flag::decode(all).len(), Flag::ALL.len());

        for flag in Flag::ALL {
            let decoded = Flag::decode(flag.mask());
            assert_eq!(decoded, vec![flag]);
        }
    }

    #[test]
    fn test_decode_preserves_declaration_order() {
        let mask = Flag::GlobalShutter.mask() | Flag::Cmos.mask() | Flag::Fan.mask();
        assert_eq!(
            Flag::decode(mask),
            vec![Flag::Cmos, Flag::Fan, Flag::GlobalShutter]
        );
    }

    #[test]
    fn test_decode_high_bits_not_truncated() {
        // CGHDR is bit 35; a decoder that truncates to u32 loses it
        assert_eq!(Flag::CgHdr.mask(), 0x0000_0008_0000_0000);
        assert_eq!(Flag::decode(0x0000_0008_0000_0000), vec![Flag::CgHdr]);
        assert_eq!(
            Flag::decode(Flag::GlobalShutter.mask()),
            vec![Flag::GlobalShutter]
        );
    }

    #[test]
    fn test_decode_u32_boundary_bit() {
        // RAW8 sits exactly on bit 31, the last bit a u32 can hold
        assert_eq!(Flag::decode(0x8000_0000), vec![Flag::Raw8]);
    }

    #[test]
    fn test_decode_ignores_unknown_bits() {
        // bit 40 is not in the registry
        let mask = (1u64 << 40) | Flag::Mono.mask();
        assert_eq!(Flag::decode(mask), vec![Flag::Mono]);
    }

    #[test]
    fn test_names_match_vendor_spelling() {
        assert_eq!(Flag::Cmos.name(), "CMOS");
        assert_eq!(Flag::CgHdr.name(), "CGHDR");
        assert_eq!(format!("{}", Flag::TriggerSoftware), "TRIGGER_SOFTWARE");
        assert_eq!(
            Flag::decode_names(Flag::Tec.mask() | Flag::Fan.mask()),
            vec!["TEC", "FAN"]
        );
    }
}
