use serde::{Deserialize, Serialize};

use crate::{Algorithm, BarValue, Container, Renderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneStatus {
    #[default]
    Idle,
    Running,
    Done,
}

/// One canvas: its container, the algorithm chosen for it, its run status
/// and the renderer it draws on.
///
/// The container is only reachable mutably through the lane, so nothing can
/// write to it while a scheduler run holds the lane.
#[derive(Debug)]
pub struct Lane<R, V = i64> {
    container: Container<V>,
    algorithm: Algorithm,
    status: LaneStatus,
    renderer: R,
}

impl<R: Renderer, V: BarValue> Lane<R, V> {
    pub fn new(container: Container<V>, algorithm: Algorithm, mut renderer: R) -> Self {
        renderer.populate(&container.heights());
        Self {
            container,
            algorithm,
            status: LaneStatus::Idle,
            renderer,
        }
    }

    pub fn container(&self) -> &Container<V> {
        &self.container
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn status(&self) -> LaneStatus {
        self.status
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Swaps in a whole new container and redraws the canvas.
    pub fn replace_container(&mut self, container: Container<V>) {
        self.container = container;
        self.status = LaneStatus::Idle;
        self.renderer.populate(&self.container.heights());
    }

    pub(crate) fn set_status(&mut self, status: LaneStatus) {
        self.status = status;
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Container<V>, &mut R) {
        (&mut self.container, &mut self.renderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderLog, RenderOp};

    #[test]
    fn new_lane_draws_its_container() {
        let lane = Lane::new(
            Container::from_values(vec![3_i64, 1, 2]),
            Algorithm::Gnome,
            RenderLog::new(),
        );

        assert_eq!(lane.status(), LaneStatus::Idle);
        assert_eq!(lane.renderer().heights(), &[3, 1, 2]);
    }

    #[test]
    fn replacing_the_container_redraws_and_resets_status() {
        let mut lane = Lane::new(
            Container::from_values(vec![3_i64, 1]),
            Algorithm::Heap,
            RenderLog::new(),
        );
        lane.set_status(LaneStatus::Done);

        lane.replace_container(Container::from_values(vec![7, 8, 9]));

        assert_eq!(lane.status(), LaneStatus::Idle);
        assert_eq!(
            lane.renderer().records().last().map(|record| &record.op),
            Some(&RenderOp::Populate(vec![7, 8, 9]))
        );
    }
}
