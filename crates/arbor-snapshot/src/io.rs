use std::io::{Read, Write};

use arbor_scene::{ColorRgb, Point3, Quat, Transform};

use crate::error::{Result, SnapshotError};
use crate::symbol::SymbolId;

pub trait WriteLeExt: Write {
    fn write_u8(&mut self, v: u8) -> Result<()> {
        self.write_all(&[v])?;
        Ok(())
    }

    fn write_u16_le(&mut self, v: u16) -> Result<()> {
        self.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_u32_le(&mut self, v: u32) -> Result<()> {
        self.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_u64_le(&mut self, v: u64) -> Result<()> {
        self.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_i32_le(&mut self, v: i32) -> Result<()> {
        self.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_f32_le(&mut self, v: f32) -> Result<()> {
        self.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_u8(v as u8)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes)?;
        Ok(())
    }

    fn write_symbol_id(&mut self, id: SymbolId) -> Result<()> {
        self.write_i32_le(id.0)
    }

    fn write_color(&mut self, c: ColorRgb) -> Result<()> {
        self.write_f32_le(c.r)?;
        self.write_f32_le(c.g)?;
        self.write_f32_le(c.b)
    }

    fn write_point3(&mut self, p: Point3) -> Result<()> {
        self.write_f32_le(p.x)?;
        self.write_f32_le(p.y)?;
        self.write_f32_le(p.z)
    }

    fn write_quat(&mut self, q: Quat) -> Result<()> {
        self.write_f32_le(q.x)?;
        self.write_f32_le(q.y)?;
        self.write_f32_le(q.z)?;
        self.write_f32_le(q.w)
    }

    fn write_transform(&mut self, t: &Transform) -> Result<()> {
        for v in t.0 {
            self.write_f32_le(v)?;
        }
        Ok(())
    }
}

impl<T: Write + ?Sized> WriteLeExt for T {}

pub trait ReadLeExt: Read {
    fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    fn read_u32_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_u64_le(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn read_i32_le(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(i32::from_le_bytes(buf))
    }

    fn read_f32_le(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SnapshotError::Corrupt("invalid boolean byte")),
        }
    }

    fn read_symbol_id(&mut self) -> Result<SymbolId> {
        Ok(SymbolId(self.read_i32_le()?))
    }

    fn read_color(&mut self) -> Result<ColorRgb> {
        Ok(ColorRgb {
            r: self.read_f32_le()?,
            g: self.read_f32_le()?,
            b: self.read_f32_le()?,
        })
    }

    fn read_point3(&mut self) -> Result<Point3> {
        Ok(Point3 {
            x: self.read_f32_le()?,
            y: self.read_f32_le()?,
            z: self.read_f32_le()?,
        })
    }

    fn read_quat(&mut self) -> Result<Quat> {
        Ok(Quat {
            x: self.read_f32_le()?,
            y: self.read_f32_le()?,
            z: self.read_f32_le()?,
            w: self.read_f32_le()?,
        })
    }

    fn read_transform(&mut self) -> Result<Transform> {
        let mut m = [0f32; 16];
        for v in m.iter_mut() {
            *v = self.read_f32_le()?;
        }
        Ok(Transform(m))
    }
}

impl<T: Read + ?Sized> ReadLeExt for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn bool_encoding_is_strict() {
        let mut cursor = Cursor::new(vec![2u8]);
        assert!(matches!(
            cursor.read_bool(),
            Err(SnapshotError::Corrupt("invalid boolean byte"))
        ));
    }

    #[test]
    fn value_encodings_round_trip() {
        let mut buf = Vec::new();
        buf.write_color(ColorRgb::new(0.25, 0.5, 0.75)).unwrap();
        buf.write_point3(Point3::new(1.0, -2.0, 3.5)).unwrap();
        buf.write_quat(Quat::new(0.0, 1.0, 0.0, 0.0)).unwrap();
        buf.write_symbol_id(SymbolId::NULL).unwrap();

        let mut cursor = Cursor::new(buf);
        assert_eq!(cursor.read_color().unwrap(), ColorRgb::new(0.25, 0.5, 0.75));
        assert_eq!(cursor.read_point3().unwrap(), Point3::new(1.0, -2.0, 3.5));
        assert_eq!(cursor.read_quat().unwrap(), Quat::new(0.0, 1.0, 0.0, 0.0));
        assert!(cursor.read_symbol_id().unwrap().is_null());
    }
}
