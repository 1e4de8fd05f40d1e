//! Packed 2-D displacement.
//!
//! A displacement is two signed 16-bit fields. In the ring it is stored as a
//! single `u32` word: horizontal delta in the high half, vertical delta in the
//! low half. Everything above the storage boundary works with [`CoordDelta`].

use zeroize::Zeroize;

/// Displacement between two consecutive pointer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Zeroize)]
pub struct CoordDelta {
    /// Horizontal displacement, wrapping at 16 bits.
    pub dx: i16,
    /// Vertical displacement, wrapping at 16 bits.
    pub dy: i16,
}

impl CoordDelta {
    /// Creates a displacement from its components.
    pub const fn new(dx: i16, dy: i16) -> Self {
        Self { dx, dy }
    }

    /// Displacement from `prev` to `cur`, each axis wrapping at 16 bits.
    pub fn between(prev: (i16, i16), cur: (i16, i16)) -> Self {
        Self {
            dx: cur.0.wrapping_sub(prev.0),
            dy: cur.1.wrapping_sub(prev.1),
        }
    }

    /// Packs into the storage word: `dx` high, `dy` low.
    #[inline]
    pub fn pack(self) -> u32 {
        ((self.dx as u16 as u32) << 16) | (self.dy as u16 as u32)
    }

    /// Inverse of [`CoordDelta::pack`].
    #[inline]
    pub fn unpack(word: u32) -> Self {
        Self {
            dx: (word >> 16) as u16 as i16,
            dy: (word & 0xffff) as u16 as i16,
        }
    }

    /// True for a zero displacement.
    pub fn is_still(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(CoordDelta::new(1, 2).pack(), 0x0001_0002);
        assert_eq!(CoordDelta::new(-1, 0).pack(), 0xffff_0000);
        assert_eq!(CoordDelta::new(0, -1).pack(), 0x0000_ffff);
        assert_eq!(CoordDelta::unpack(0xfffe_0003), CoordDelta::new(-2, 3));
    }

    #[test]
    fn test_between_wraps() {
        let d = CoordDelta::between((i16::MAX, 0), (i16::MIN, 5));
        assert_eq!(d, CoordDelta::new(1, 5));
        assert!(CoordDelta::between((7, 7), (7, 7)).is_still());
    }
}
