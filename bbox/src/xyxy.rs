use crate::{common::*, Scale, HW};

/// Bounding box in (xmin, ymin, xmax, ymax) format, in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Xyxy<T> {
    pub(crate) xmin: T,
    pub(crate) ymin: T,
    pub(crate) xmax: T,
    pub(crate) ymax: T,
}

impl<T> Xyxy<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn try_from_xyxy(xyxy: [T; 4]) -> Result<Self> {
        let [xmin, ymin, xmax, ymax] = xyxy;
        ensure!(
            xmax >= xmin && ymax >= ymin,
            "xmax >= xmin and ymax >= ymin must hold"
        );
        Ok(Self {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }

    pub fn from_xyxy(xyxy: [T; 4]) -> Self {
        Self::try_from_xyxy(xyxy).unwrap()
    }

    pub fn xyxy(&self) -> [T; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    pub fn xmin(&self) -> T {
        self.xmin
    }

    pub fn ymin(&self) -> T {
        self.ymin
    }

    pub fn xmax(&self) -> T {
        self.xmax
    }

    pub fn ymax(&self) -> T {
        self.ymax
    }

    pub fn h(&self) -> T {
        self.ymax - self.ymin
    }

    pub fn w(&self) -> T {
        self.xmax - self.xmin
    }

    pub fn size(&self) -> HW<T> {
        HW::from_hw([self.h(), self.w()])
    }
}

impl<T> Xyxy<T>
where
    T: Copy + Num,
{
    /// Maps the box onto another pixel grid. Positive scales keep the corner order.
    pub fn transform(&self, scale: &Scale<T>) -> Self {
        Xyxy {
            xmin: self.xmin * scale.sx,
            ymin: self.ymin * scale.sy,
            xmax: self.xmax * scale.sx,
            ymax: self.ymax * scale.sy,
        }
    }
}

impl<T> TryFrom<[T; 4]> for Xyxy<T>
where
    T: Copy + Num + PartialOrd,
{
    type Error = anyhow::Error;

    fn try_from(xyxy: [T; 4]) -> Result<Self, Self::Error> {
        Self::try_from_xyxy(xyxy)
    }
}
