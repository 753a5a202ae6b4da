//! Circular slot layout for the critic panel
//!
//! Critics sit evenly spaced on a circle around the idea, starting from the
//! top and proceeding clockwise. The slot of the most recently completed
//! critic is marked focused so a renderer can direct attention to it.

use critique_domain::{CriticIndex, CriticPanel};

/// One positioned critic slot
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub critic: CriticIndex,
    pub x: f32,
    pub y: f32,
    pub focused: bool,
}

/// Layout geometry: a circle of critic slots around a center point
#[derive(Debug, Clone)]
pub struct CircularLayout {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl Default for CircularLayout {
    fn default() -> Self {
        Self {
            center_x: 400.0,
            center_y: 300.0,
            radius: 220.0,
        }
    }
}

impl CircularLayout {
    /// Position every critic in the panel, focusing `attention` if given
    pub fn slots(&self, panel: &CriticPanel, attention: Option<CriticIndex>) -> Vec<Slot> {
        let count = panel.len();
        panel
            .iter()
            .enumerate()
            .map(|(i, critic)| {
                // Start from the top of the circle
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU
                    - std::f32::consts::FRAC_PI_2;
                Slot {
                    critic: critic.index,
                    x: self.center_x + self.radius * angle.cos(),
                    y: self.center_y + self.radius * angle.sin(),
                    focused: attention == Some(critic.index),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn first_slot_is_at_the_top() {
        let panel = CriticPanel::with_default_roster(6).unwrap();
        let slots = CircularLayout::default().slots(&panel, None);
        assert_eq!(slots.len(), 6);
        assert!(close(slots[0].x, 400.0));
        assert!(close(slots[0].y, 80.0));
    }

    #[test]
    fn slots_stay_on_the_circle() {
        let panel = CriticPanel::with_default_roster(5).unwrap();
        let layout = CircularLayout::default();
        for slot in layout.slots(&panel, None) {
            let dx = slot.x - layout.center_x;
            let dy = slot.y - layout.center_y;
            assert!(close((dx * dx + dy * dy).sqrt(), layout.radius));
        }
    }

    #[test]
    fn attention_focuses_exactly_one_slot() {
        let panel = CriticPanel::with_default_roster(3).unwrap();
        let focus = CriticIndex::new(2).unwrap();
        let slots = CircularLayout::default().slots(&panel, Some(focus));
        let focused: Vec<_> = slots.iter().filter(|s| s.focused).collect();
        assert_eq!(focused.len(), 1);
        assert_eq!(focused[0].critic, focus);
    }
}
