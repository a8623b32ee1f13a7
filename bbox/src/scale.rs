use crate::{common::*, Xyxy, HW};

/// Per-axis scaling between two pixel grids sharing the top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale<T> {
    pub sy: T,
    pub sx: T,
}

impl<T> Scale<T>
where
    T: Copy + Num,
{
    pub fn uniform(factor: T) -> Self {
        Self {
            sy: factor,
            sx: factor,
        }
    }

    /// The scale that maps coordinates on `src_size` onto `tgt_size`.
    ///
    /// The two axes are computed independently, so it stays exact when
    /// rounding of the target size made the aspect ratio drift.
    pub fn from_sizes(src_size: &HW<T>, tgt_size: &HW<T>) -> Self
    where
        T: PartialOrd,
    {
        Self {
            sy: tgt_size.h() / src_size.h(),
            sx: tgt_size.w() / src_size.w(),
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            sy: T::one() / self.sy,
            sx: T::one() / self.sx,
        }
    }
}

impl<T> Mul<&Xyxy<T>> for &Scale<T>
where
    T: Copy + Num,
{
    type Output = Xyxy<T>;

    fn mul(self, rhs: &Xyxy<T>) -> Self::Output {
        rhs.transform(self)
    }
}

impl<T> Mul<&Scale<T>> for &Scale<T>
where
    T: Copy + Num,
{
    type Output = Scale<T>;

    fn mul(self, rhs: &Scale<T>) -> Self::Output {
        Scale {
            sy: self.sy * rhs.sy,
            sx: self.sx * rhs.sx,
        }
    }
}
