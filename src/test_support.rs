//! Synthetic captures for unit tests.
use byteordered::ByteOrdered;

use crate::{
    header::{HEADER_LEN, SENTINEL},
    payload::THUMBNAIL_LEN,
};

pub(crate) struct Synthetic {
    pub gray_dims: (u16, u16),
    pub gray: Vec<u8>,
    pub gray_size: u32,
    pub thermal_dims: (u16, u16),
    pub thermal: Vec<u16>,
    pub thermal_size: u32,
    pub sentinel: bool,
    pub thumbnail_len: usize,
}

impl Synthetic {
    pub fn new(
        gray_dims: (u16, u16),
        gray: Vec<u8>,
        thermal_dims: (u16, u16),
        thermal: Vec<u16>,
    ) -> Self {
        Synthetic {
            gray_dims,
            gray_size: gray.len() as u32,
            gray,
            thermal_dims,
            thermal_size: thermal.len() as u32,
            thermal,
            sentinel: true,
            thumbnail_len: THUMBNAIL_LEN,
        }
    }

    pub fn header(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN);
        {
            let mut w = ByteOrdered::le(&mut buf);
            w.write_i32(-0x1234).unwrap();
            w.write_u32(self.gray_size).unwrap();
            w.write_u16(self.gray_dims.0).unwrap();
            w.write_u16(self.gray_dims.1).unwrap();
            w.write_i8(-2).unwrap();
            w.write_u32(self.thermal_size).unwrap();
            w.write_u16(self.thermal_dims.0).unwrap();
            w.write_u16(self.thermal_dims.1).unwrap();
            w.write_u8(0xEE).unwrap();
            w.write_u32(4050).unwrap();
            w.write_u16(45).unwrap();
            w.write_u16(30).unwrap();
            for v in [9500, 2_931_500, 2_981_500, 15_000, 77, 10_000, 0].iter() {
                w.write_u32(*v).unwrap();
            }
            w.write_u16(0xBEEF).unwrap();
            for _ in 0..14 {
                w.write_u8(0x5A).unwrap();
            }
            w.write_u8(0x42).unwrap();
        }
        buf.resize(HEADER_LEN, 0);
        if self.sentinel {
            buf[HEADER_LEN - 2..].copy_from_slice(&SENTINEL);
        }
        buf
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = self.header();
        if !self.sentinel {
            buf.resize(0x100, 0);
        }
        buf.extend_from_slice(&self.gray);
        {
            let mut w = ByteOrdered::le(&mut buf);
            for v in self.thermal.iter() {
                w.write_u16(*v).unwrap();
            }
        }
        buf.extend((0..self.thumbnail_len).map(|i| i as u8));
        buf
    }
}
