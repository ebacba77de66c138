//! Canon EOS value tables.
//!
//! EOS cameras do not take aperture, ISO or shutter values directly; each
//! property accepts a one-byte step code. These tables translate the
//! human-readable values used by `ptp_set_property;"name",value` into those
//! codes. Lookups are exact; a value that is not a camera step is `None`.

/// f-number × 10 → EOS aperture code.
static APERTURE: &[(i32, u32)] = &[
    (10, 0x08),
    (11, 0x0B),
    (12, 0x0C),
    (14, 0x10),
    (16, 0x13),
    (18, 0x14),
    (20, 0x18),
    (22, 0x1B),
    (25, 0x1C),
    (28, 0x20),
    (32, 0x23),
    (35, 0x24),
    (40, 0x28),
    (45, 0x2B),
    (50, 0x2D),
    (56, 0x30),
    (63, 0x33),
    (71, 0x35),
    (80, 0x38),
    (90, 0x3B),
    (100, 0x3D),
    (110, 0x40),
    (130, 0x43),
    (140, 0x45),
    (160, 0x48),
    (180, 0x4B),
    (200, 0x4D),
    (220, 0x50),
    (250, 0x53),
    (290, 0x55),
    (320, 0x58),
];

/// ISO number → EOS ISO code. `0` is auto.
static ISO: &[(i32, u32)] = &[
    (0, 0x00),
    (50, 0x40),
    (100, 0x48),
    (125, 0x4B),
    (160, 0x4D),
    (200, 0x50),
    (250, 0x53),
    (320, 0x55),
    (400, 0x58),
    (500, 0x5B),
    (640, 0x5D),
    (800, 0x60),
    (1000, 0x63),
    (1250, 0x65),
    (1600, 0x68),
    (2000, 0x6B),
    (2500, 0x6D),
    (3200, 0x70),
    (4000, 0x73),
    (5000, 0x75),
    (6400, 0x78),
    (12800, 0x80),
    (25600, 0x88),
];

/// Exposure time in microseconds → EOS shutter code. `0` is bulb.
static SHUTTER: &[(i32, u32)] = &[
    (0, 0x0C),
    (30_000_000, 0x10),
    (25_000_000, 0x13),
    (20_000_000, 0x15),
    (15_000_000, 0x18),
    (13_000_000, 0x1B),
    (10_000_000, 0x1D),
    (8_000_000, 0x20),
    (6_000_000, 0x23),
    (5_000_000, 0x25),
    (4_000_000, 0x28),
    (3_200_000, 0x2B),
    (2_500_000, 0x2D),
    (2_000_000, 0x30),
    (1_600_000, 0x33),
    (1_300_000, 0x35),
    (1_000_000, 0x38),
    (800_000, 0x3B),
    (600_000, 0x3D),
    (500_000, 0x40),
    (400_000, 0x43),
    (300_000, 0x45),
    (1_000_000 / 4, 0x48),
    (1_000_000 / 5, 0x4B),
    (1_000_000 / 6, 0x4D),
    (1_000_000 / 8, 0x50),
    (1_000_000 / 10, 0x53),
    (1_000_000 / 13, 0x55),
    (1_000_000 / 15, 0x58),
    (1_000_000 / 20, 0x5B),
    (1_000_000 / 25, 0x5D),
    (1_000_000 / 30, 0x60),
    (1_000_000 / 40, 0x63),
    (1_000_000 / 50, 0x65),
    (1_000_000 / 60, 0x68),
    (1_000_000 / 80, 0x6B),
    (1_000_000 / 100, 0x6D),
    (1_000_000 / 125, 0x70),
    (1_000_000 / 160, 0x73),
    (1_000_000 / 200, 0x75),
    (1_000_000 / 250, 0x78),
    (1_000_000 / 320, 0x7B),
    (1_000_000 / 400, 0x7D),
    (1_000_000 / 500, 0x80),
    (1_000_000 / 640, 0x83),
    (1_000_000 / 800, 0x85),
    (1_000_000 / 1000, 0x88),
    (1_000_000 / 1250, 0x8B),
    (1_000_000 / 1600, 0x8D),
    (1_000_000 / 2000, 0x90),
    (1_000_000 / 2500, 0x93),
    (1_000_000 / 3200, 0x95),
    (1_000_000 / 4000, 0x98),
    (1_000_000 / 5000, 0x9B),
    (1_000_000 / 6400, 0x9D),
    (1_000_000 / 8000, 0xA0),
];

/// Bridge image format id → EOS single-image descriptor
/// (`kind << 16 | size << 8 | quality`).
static IMAGE_FORMAT: &[(i32, u32)] = &[
    (1, 0x0006_0004), // raw
    (2, 0x0001_0002), // jpeg, large, normal
    (3, 0x0001_0003), // jpeg, large, fine
    (4, 0x0106_0003), // raw + jpeg fine
];

fn lookup(table: &[(i32, u32)], value: i32) -> Option<u32> {
    table.iter().find(|(v, _)| *v == value).map(|(_, code)| *code)
}

pub fn aperture_code(f_number_x10: i32) -> Option<u32> {
    lookup(APERTURE, f_number_x10)
}

pub fn iso_code(iso: i32) -> Option<u32> {
    lookup(ISO, iso)
}

pub fn shutter_code(exposure_us: i32) -> Option<u32> {
    lookup(SHUTTER, exposure_us)
}

pub fn image_format_code(format: i32) -> Option<u32> {
    lookup(IMAGE_FORMAT, format)
}

/// EOS viewfinder output values used for mirror control.
pub const VF_OUTPUT_MIRROR_UP: u32 = 3;
pub const VF_OUTPUT_MIRROR_DOWN: u32 = 0;

/// `mode` argument of remote release: 1 = half press, 2 = full press.
pub const RELEASE_HALF: i32 = 1;
pub const RELEASE_FULL: i32 = 2;
