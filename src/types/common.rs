//! Common types shared by the descriptors.

/// 3D extent for textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent3d {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Depth in pixels (1 for 2D textures).
    pub depth: u32,
}

impl Extent3d {
    /// Create a new 2D extent.
    pub fn new_2d(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            depth: 1,
        }
    }

    /// Create a new 3D extent.
    pub fn new_3d(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Number of texels covered by this extent.
    pub fn texel_count(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64
    }

    /// Extent of the given mip level, clamped to one texel per axis.
    pub fn mip_level(&self, level: u32) -> Self {
        Self {
            width: (self.width >> level).max(1),
            height: (self.height >> level).max(1),
            depth: (self.depth >> level).max(1),
        }
    }
}

impl std::fmt::Display for Extent3d {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.depth == 1 {
            write!(f, "{}x{}", self.width, self.height)
        } else {
            write!(f, "{}x{}x{}", self.width, self.height, self.depth)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_clamps() {
        let extent = Extent3d::new_2d(1920, 1080);
        assert_eq!(extent.mip_level(1), Extent3d::new_2d(960, 540));
        assert_eq!(extent.mip_level(12), Extent3d::new_2d(1, 1));
    }

    #[test]
    fn test_display() {
        assert_eq!(Extent3d::new_2d(800, 600).to_string(), "800x600");
        assert_eq!(Extent3d::new_3d(32, 32, 4).to_string(), "32x32x4");
    }
}
