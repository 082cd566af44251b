/// WGS84 longitude/latitude in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_valid(&self) -> bool {
        self.lon_deg.is_finite()
            && self.lat_deg.is_finite()
            && (-90.0..=90.0).contains(&self.lat_deg)
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lon_deg, self.lat_deg]
    }
}

/// Screen-space offset in pixels relative to an anchor on the map.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

impl PixelOffset {
    /// Offset at `angle_rad` and distance `radius_px` from the anchor.
    pub fn polar(angle_rad: f64, radius_px: f64) -> Self {
        Self {
            x: radius_px * angle_rad.cos(),
            y: radius_px * angle_rad.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LonLat, PixelOffset};

    #[test]
    fn validity_rejects_out_of_range_latitude() {
        assert!(LonLat::new(163.7, -12.7).is_valid());
        assert!(!LonLat::new(0.0, 91.0).is_valid());
        assert!(!LonLat::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn polar_offset_on_axes() {
        let p = PixelOffset::polar(0.0, 10.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!(p.y.abs() < 1e-9);
        let q = PixelOffset::polar(std::f64::consts::FRAC_PI_2, 4.0);
        assert!(q.x.abs() < 1e-9);
        assert!((q.y - 4.0).abs() < 1e-9);
    }
}
