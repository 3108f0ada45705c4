use byteorder::{BigEndian as BE, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

pub fn write_u16_be<W: Write>(w: &mut W, v: u16) -> io::Result<()> { w.write_u16::<BE>(v) }
pub fn write_u32_be<W: Write>(w: &mut W, v: u32) -> io::Result<()> { w.write_u32::<BE>(v) }
pub fn read_u16_be<R: Read>(r: &mut R) -> io::Result<u16> { r.read_u16::<BE>() }
pub fn read_u32_be<R: Read>(r: &mut R) -> io::Result<u32> { r.read_u32::<BE>() }
