//! Little-endian record helpers
//!
//! Fixed-size binary fields used by entity and actor records. Names are stored
//! as NUL-padded byte arrays of [`NAME_LENGTH`] bytes.

use std::io::{self, Read, Write};

use crate::foundation::math::Vec3;

/// Size of a stored name in bytes
pub const NAME_LENGTH: usize = 64;

/// Read a little-endian `i32`
pub fn read_i32(reader: &mut impl Read) -> io::Result<i32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

/// Read a little-endian `u32`
pub fn read_u32(reader: &mut impl Read) -> io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_le_bytes(bytes))
}

/// Read one byte
pub fn read_u8(reader: &mut impl Read) -> io::Result<u8> {
    let mut bytes = [0u8; 1];
    reader.read_exact(&mut bytes)?;
    Ok(bytes[0])
}

/// Read a little-endian `f32`
pub fn read_f32(reader: &mut impl Read) -> io::Result<f32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(f32::from_le_bytes(bytes))
}

/// Read three consecutive `f32`s
pub fn read_vec3(reader: &mut impl Read) -> io::Result<Vec3> {
    Ok(Vec3::new(read_f32(reader)?, read_f32(reader)?, read_f32(reader)?))
}

/// Read a NUL-padded name; bytes after the first NUL are ignored
pub fn read_name(reader: &mut impl Read) -> io::Result<String> {
    let mut bytes = [0u8; NAME_LENGTH];
    reader.read_exact(&mut bytes)?;
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(NAME_LENGTH);
    Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

/// Write a little-endian `i32`
pub fn write_i32(writer: &mut impl Write, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Write a little-endian `u32`
pub fn write_u32(writer: &mut impl Write, value: u32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Write one byte
pub fn write_u8(writer: &mut impl Write, value: u8) -> io::Result<()> {
    writer.write_all(&[value])
}

/// Write a little-endian `f32`
pub fn write_f32(writer: &mut impl Write, value: f32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}

/// Write three consecutive `f32`s
pub fn write_vec3(writer: &mut impl Write, value: &Vec3) -> io::Result<()> {
    for component in value.iter() {
        write_f32(writer, *component)?;
    }
    Ok(())
}

/// Write a NUL-padded name
///
/// Names longer than `NAME_LENGTH - 1` bytes are truncated so a terminator
/// always fits.
pub fn write_name(writer: &mut impl Write, name: &str) -> io::Result<()> {
    let mut bytes = [0u8; NAME_LENGTH];
    let len = name.len().min(NAME_LENGTH - 1);
    if len < name.len() {
        log::warn!("Name '{}' truncated to {} bytes", name, len);
    }
    bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
    writer.write_all(&bytes)
}
