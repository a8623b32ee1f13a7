use crate::common::*;

/// Height and width of an image or a pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HW<T> {
    h: T,
    w: T,
}

impl<T> HW<T> {
    pub fn try_cast<U>(self) -> Option<HW<U>>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        Some(HW {
            h: U::from(self.h)?,
            w: U::from(self.w)?,
        })
    }

    pub fn cast<U>(self) -> HW<U>
    where
        T: ToPrimitive,
        U: NumCast,
    {
        self.try_cast().unwrap()
    }
}

impl<T> HW<T>
where
    T: Num + PartialOrd + Copy,
{
    pub fn try_from_hw(hw: [T; 2]) -> Result<Self> {
        let [h, w] = hw;
        let zero = T::zero();
        ensure!(
            h >= zero && w >= zero,
            "height and width parameters must be non-negative"
        );
        Ok(Self { h, w })
    }

    pub fn from_hw(hw: [T; 2]) -> Self {
        Self::try_from_hw(hw).unwrap()
    }

    pub fn hw(&self) -> [T; 2] {
        [self.h, self.w]
    }

    pub fn h(&self) -> T {
        self.h
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn area(&self) -> T {
        self.h * self.w
    }

    /// The shorter of the two edges.
    pub fn min_edge(&self) -> T {
        if self.h <= self.w {
            self.h
        } else {
            self.w
        }
    }

    /// The longer of the two edges.
    pub fn max_edge(&self) -> T {
        if self.h >= self.w {
            self.h
        } else {
            self.w
        }
    }
}

impl<T> TryFrom<[T; 2]> for HW<T>
where
    T: Num + PartialOrd + Copy,
{
    type Error = anyhow::Error;

    fn try_from(hw: [T; 2]) -> Result<Self, Self::Error> {
        Self::try_from_hw(hw)
    }
}

impl<T> TryFrom<(T, T)> for HW<T>
where
    T: Num + PartialOrd + Copy,
{
    type Error = anyhow::Error;

    fn try_from((h, w): (T, T)) -> Result<Self, Self::Error> {
        Self::try_from_hw([h, w])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn size_area() {
        let s1 = HW::from_hw([3.0, 2.0]);
        let area: f64 = s1.area();
        assert_abs_diff_eq!(area, 6.0);
    }

    #[test]
    fn size_edges() {
        let size = HW::from_hw([600, 800]);
        assert_eq!(size.min_edge(), 600);
        assert_eq!(size.max_edge(), 800);

        let size = HW::from_hw([1000, 100]);
        assert_eq!(size.min_edge(), 100);
        assert_eq!(size.max_edge(), 1000);
    }

    #[test]
    fn negative_size_is_rejected() {
        assert!(HW::try_from_hw([-1, 4]).is_err());
        assert!(HW::try_from((4.0, -0.5)).is_err());
        assert!(HW::try_from([3, -2]).is_err());
        assert_eq!(HW::try_from([3, 2]).unwrap().hw(), [3, 2]);
    }
}
