use std::ops::{Add,Sub};

//continuous point in 2d space
#[derive(Copy,Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct CPoint2 {
    pub x: f64,
    pub y: f64,
}

impl CPoint2 {
    pub fn new(x: f64, y: f64) -> CPoint2 {
        CPoint2{x, y}
    }

    pub fn ceil(self) -> DPoint2 {
        DPoint2::new(self.x.ceil() as i64, self.y.ceil() as i64)
    }

    pub fn scale(self, scale: f64) -> Self {
        CPoint2::new(self.x * scale, self.y * scale)
    }
}

impl Add for CPoint2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for CPoint2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

//discrete point in 2d space. pixels, y grows downwards
#[derive(Copy,Clone,Debug,PartialEq,Hash,Eq)]
pub struct DPoint2 {
    pub x: i64,
    pub y: i64,
}

impl DPoint2 {
    pub fn new(x: i64, y: i64) -> DPoint2 {
        DPoint2{x, y}
    }
    pub fn shift_x(self, shift: i64) -> DPoint2 {
        DPoint2{x: self.x.saturating_add(shift), y: self.y}
    }
    pub fn shift_y(self, shift: i64) -> DPoint2 {
        DPoint2{x: self.x, y: self.y.saturating_add(shift)}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_rounds_up_per_axis() {
        assert_eq!(CPoint2::new(2.1, -0.9).ceil(), DPoint2::new(3, 0));
    }

    #[test]
    fn arithmetic() {
        let a = CPoint2::new(1.0, 2.0);
        let b = CPoint2::new(0.5, -1.0);
        assert_eq!(a + b, CPoint2::new(1.5, 1.0));
        assert_eq!(a - b, CPoint2::new(0.5, 3.0));
        assert_eq!(a.scale(2.0), CPoint2::new(2.0, 4.0));
        assert_eq!(DPoint2::new(1, 1).shift_x(3).shift_y(-2), DPoint2::new(4, -1));
        assert_eq!(DPoint2::new(i64::MIN, i64::MAX).shift_x(-1).shift_y(1), DPoint2::new(i64::MIN, i64::MAX));
    }

    #[test]
    fn ignores_extra_keys() {
        let p: CPoint2 = ::serde_json::from_str(r#"{"x": 10, "y": -3.5, "id": 7}"#).unwrap();
        assert_eq!(p, CPoint2::new(10.0, -3.5));
    }
}
