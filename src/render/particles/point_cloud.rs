/// 固定大小的点位置数组
///
/// `positions` 以 xyz 交错存储，长度恒为 `count * 3`。
/// `needs_update` 标记主机端副本已修改，渲染器上传后清除。
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    positions: Vec<f32>,
    needs_update: bool,
}

impl PointCloud {
    /// 创建`count`个位于原点的点
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            needs_update: true,
        }
    }

    /// 从点列表创建
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        Self {
            positions: points.iter().flatten().copied().collect(),
            needs_update: true,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 交错的位置数组（上传给GPU）
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn point(&self, index: usize) -> [f32; 3] {
        let i3 = index * 3;
        [
            self.positions[i3],
            self.positions[i3 + 1],
            self.positions[i3 + 2],
        ]
    }

    pub fn set_point(&mut self, index: usize, point: [f32; 3]) {
        let i3 = index * 3;
        self.positions[i3..i3 + 3].copy_from_slice(&point);
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn mark_dirty(&mut self) {
        self.needs_update = true;
    }

    /// 渲染器上传后调用
    pub fn mark_uploaded(&mut self) {
        self.needs_update = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_is_three_per_point() {
        let cloud = PointCloud::new(7);
        assert_eq!(cloud.len(), 7);
        assert_eq!(cloud.positions().len(), 21);
    }

    #[test]
    fn test_set_point_overwrites_slot() {
        let mut cloud = PointCloud::from_points(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]]);
        cloud.set_point(0, [4.0, 5.0, 6.0]);
        assert_eq!(cloud.point(0), [4.0, 5.0, 6.0]);
        assert_eq!(cloud.point(1), [1.0, 2.0, 3.0]);
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn test_dirty_flag_cycle() {
        let mut cloud = PointCloud::new(1);
        assert!(cloud.needs_update());
        cloud.mark_uploaded();
        assert!(!cloud.needs_update());
        cloud.mark_dirty();
        assert!(cloud.needs_update());
    }
}
